//! Defensive gate applied before any Case or UAC write.
//!
//! The upstream bus broadcasts events for surveys and exercises this service
//! does not own; rejected events are logged and permanently dropped, never
//! treated as errors.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{CollectionExercise, Survey};

/// Read-only lookups the filter depends on. Implemented for `PgPool` in
/// production and by counting mocks in tests.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn find_survey(&self, survey_id: Uuid) -> Result<Option<Survey>>;

    async fn find_collection_exercise(
        &self,
        collection_exercise_id: Uuid,
    ) -> Result<Option<CollectionExercise>>;
}

#[async_trait]
impl MetadataStore for PgPool {
    async fn find_survey(&self, survey_id: Uuid) -> Result<Option<Survey>> {
        Ok(Survey::find_by_id(self, survey_id).await?)
    }

    async fn find_collection_exercise(
        &self,
        collection_exercise_id: Uuid,
    ) -> Result<Option<CollectionExercise>> {
        Ok(CollectionExercise::find_by_id(self, collection_exercise_id).await?)
    }
}

/// Decides whether an inbound event's survey and collection-exercise
/// prerequisites exist and are of an accepted type.
pub struct EventFilter {
    store: Arc<dyn MetadataStore>,
    accepted_survey_types: Vec<String>,
}

impl EventFilter {
    pub fn new(store: Arc<dyn MetadataStore>, accepted_survey_types: Vec<String>) -> Self {
        Self {
            store,
            accepted_survey_types,
        }
    }

    /// Returns false for events this deployment does not own. Lookup order is
    /// contractual: the survey is checked first and an absent survey
    /// short-circuits without consulting the collection-exercise store.
    pub async fn is_valid_event(
        &self,
        survey_id: Uuid,
        collection_exercise_id: Uuid,
        case_id: Option<Uuid>,
        message_id: Uuid,
    ) -> Result<bool> {
        let Some(survey) = self.store.find_survey(survey_id).await? else {
            warn!(
                %message_id,
                %survey_id,
                case_id = ?case_id,
                "🗑️ Discarding event: survey not found"
            );
            return Ok(false);
        };

        let accepted = survey
            .survey_type()
            .is_some_and(|survey_type| self.accepted_survey_types.iter().any(|t| t == survey_type));
        if !accepted {
            warn!(
                %message_id,
                %survey_id,
                survey_type = ?survey.survey_type(),
                case_id = ?case_id,
                "🗑️ Discarding event: survey type not accepted"
            );
            return Ok(false);
        }

        if self
            .store
            .find_collection_exercise(collection_exercise_id)
            .await?
            .is_none()
        {
            warn!(
                %message_id,
                %collection_exercise_id,
                case_id = ?case_id,
                "🗑️ Discarding event: collection exercise not found"
            );
            return Ok(false);
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    struct MockMetadataStore {
        surveys: HashMap<Uuid, Survey>,
        collection_exercises: HashMap<Uuid, CollectionExercise>,
        collection_exercise_lookups: AtomicUsize,
    }

    impl MockMetadataStore {
        fn new() -> Self {
            Self {
                surveys: HashMap::new(),
                collection_exercises: HashMap::new(),
                collection_exercise_lookups: AtomicUsize::new(0),
            }
        }

        fn with_survey(mut self, id: Uuid, survey_type: &str) -> Self {
            self.surveys.insert(
                id,
                Survey {
                    id,
                    name: "Test Survey".to_string(),
                    sample_definition: json!({"surveyType": survey_type}),
                },
            );
            self
        }

        fn with_collection_exercise(mut self, id: Uuid, survey_id: Uuid) -> Self {
            self.collection_exercises.insert(
                id,
                CollectionExercise {
                    id,
                    survey_id,
                    name: "Test Exercise".to_string(),
                    reference: "EX-1".to_string(),
                    start_date: None,
                    end_date: None,
                    wave_config: json!({}),
                },
            );
            self
        }
    }

    #[async_trait]
    impl MetadataStore for MockMetadataStore {
        async fn find_survey(&self, survey_id: Uuid) -> Result<Option<Survey>> {
            Ok(self.surveys.get(&survey_id).cloned())
        }

        async fn find_collection_exercise(
            &self,
            collection_exercise_id: Uuid,
        ) -> Result<Option<CollectionExercise>> {
            self.collection_exercise_lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.collection_exercises.get(&collection_exercise_id).cloned())
        }
    }

    fn filter_over(store: MockMetadataStore) -> (EventFilter, Arc<MockMetadataStore>) {
        let store = Arc::new(store);
        let filter = EventFilter::new(store.clone(), vec!["SOCIAL".to_string()]);
        (filter, store)
    }

    #[tokio::test]
    async fn test_missing_survey_short_circuits_collection_exercise_lookup() {
        let (filter, store) = filter_over(MockMetadataStore::new());

        let valid = filter
            .is_valid_event(Uuid::new_v4(), Uuid::new_v4(), None, Uuid::new_v4())
            .await
            .unwrap();

        assert!(!valid);
        assert_eq!(store.collection_exercise_lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unaccepted_survey_type_is_rejected() {
        let survey_id = Uuid::new_v4();
        let collex_id = Uuid::new_v4();
        let (filter, store) = filter_over(
            MockMetadataStore::new()
                .with_survey(survey_id, "BUSINESS")
                .with_collection_exercise(collex_id, survey_id),
        );

        let valid = filter
            .is_valid_event(survey_id, collex_id, None, Uuid::new_v4())
            .await
            .unwrap();

        assert!(!valid);
        // The type check rejects before the collection exercise is consulted
        assert_eq!(store.collection_exercise_lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_collection_exercise_is_rejected() {
        let survey_id = Uuid::new_v4();
        let (filter, _store) = filter_over(MockMetadataStore::new().with_survey(survey_id, "SOCIAL"));

        let valid = filter
            .is_valid_event(survey_id, Uuid::new_v4(), Some(Uuid::new_v4()), Uuid::new_v4())
            .await
            .unwrap();

        assert!(!valid);
    }

    #[tokio::test]
    async fn test_known_survey_and_exercise_pass() {
        let survey_id = Uuid::new_v4();
        let collex_id = Uuid::new_v4();
        let (filter, _store) = filter_over(
            MockMetadataStore::new()
                .with_survey(survey_id, "SOCIAL")
                .with_collection_exercise(collex_id, survey_id),
        );

        let valid = filter
            .is_valid_event(survey_id, collex_id, Some(Uuid::new_v4()), Uuid::new_v4())
            .await
            .unwrap();

        assert!(valid);
    }
}
