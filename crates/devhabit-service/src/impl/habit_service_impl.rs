//! Habit service implementation.

use crate::dto::{
    ApiVersion, CreateHabitRequest, HabitDto, HabitDtoV2, HabitPatchTarget, HabitWithTagsDto, HabitWithTagsDtoV2,
    HabitsQuery, UpdateHabitRequest,
};
use crate::habit_service::HabitService;
use crate::patch::{apply_patch, PatchDocument};
use crate::sort_mappings::{HABIT_DEFAULT_ORDER, TIEBREAKER};
use async_trait::async_trait;
use devhabit_core::{
    DataShapingService, DevHabitError, DevHabitResult, Habit, HabitId, PaginationResult, Shape, SortMappingProvider,
    SortPlan, UserId, ValidateExt,
};
use devhabit_repository::HabitRepository;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};

/// Habit service component for Shaku DI.
#[derive(Component)]
#[shaku(interface = HabitService)]
pub struct HabitServiceComponent {
    #[shaku(inject)]
    habit_repository: Arc<dyn HabitRepository>,
    sort_mappings: Arc<SortMappingProvider>,
    data_shaping: DataShapingService,
}

impl HabitServiceComponent {
    /// Creates the service outside of the DI container.
    #[must_use]
    pub fn new(habit_repository: Arc<dyn HabitRepository>, sort_mappings: Arc<SortMappingProvider>) -> Self {
        Self {
            habit_repository,
            sort_mappings,
            data_shaping: DataShapingService::new(),
        }
    }

    /// Validates `sort` and `fields` against the list representation `D`.
    fn list_plan<D: Shape + 'static>(&self, query: &HabitsQuery) -> DevHabitResult<SortPlan> {
        let sort = query.sort.as_deref();
        if !self.sort_mappings.validate_mappings::<D, Habit>(sort) {
            return Err(DevHabitError::invalid_sort(sort));
        }
        self.ensure_fields::<D>(query.fields.as_deref())?;

        let mappings = self.sort_mappings.get_mappings::<D, Habit>()?;
        SortPlan::resolve(sort, mappings, HABIT_DEFAULT_ORDER, TIEBREAKER)
    }

    fn ensure_fields<D: Shape>(&self, fields: Option<&str>) -> DevHabitResult<()> {
        if self.data_shaping.validate::<D>(fields) {
            Ok(())
        } else {
            Err(DevHabitError::invalid_fields(fields))
        }
    }

    async fn load(&self, user_id: &UserId, id: &HabitId) -> DevHabitResult<Habit> {
        self.habit_repository
            .find_by_id(user_id, id)
            .await?
            .ok_or_else(|| DevHabitError::not_found("Habit", id))
    }
}

#[async_trait]
impl HabitService for HabitServiceComponent {
    async fn get_habits(
        &self,
        user_id: &UserId,
        query: &HabitsQuery,
        version: ApiVersion,
    ) -> DevHabitResult<PaginationResult<Habit>> {
        debug!("Listing habits for user {}: {:?}", user_id, query);

        let plan = match version {
            ApiVersion::V1 => self.list_plan::<HabitDto>(query)?,
            ApiVersion::V2 => self.list_plan::<HabitDtoV2>(query)?,
        };
        let page = query.page_request();

        let (items, total) = self
            .habit_repository
            .find_page(user_id, &query.filter(), &plan, page)
            .await?;

        Ok(PaginationResult::new(items, page, total))
    }

    async fn get_habit(
        &self,
        user_id: &UserId,
        id: &HabitId,
        fields: Option<&str>,
        version: ApiVersion,
    ) -> DevHabitResult<(Habit, Vec<String>)> {
        debug!("Getting habit {} for user {}", id, user_id);

        match version {
            ApiVersion::V1 => self.ensure_fields::<HabitWithTagsDto>(fields)?,
            ApiVersion::V2 => self.ensure_fields::<HabitWithTagsDtoV2>(fields)?,
        }

        self.habit_repository
            .find_with_tags(user_id, id)
            .await?
            .ok_or_else(|| DevHabitError::not_found("Habit", id))
    }

    async fn create_habit(&self, user_id: &UserId, request: CreateHabitRequest) -> DevHabitResult<Habit> {
        debug!("Creating habit for user {}: {}", user_id, request.name);

        request.validate_request()?;

        let habit = request.into_habit(user_id.clone());
        self.habit_repository.insert(&habit).await?;

        info!("Habit created: {}", habit.id);
        Ok(habit)
    }

    async fn update_habit(&self, user_id: &UserId, id: &HabitId, request: UpdateHabitRequest) -> DevHabitResult<()> {
        debug!("Updating habit {} for user {}", id, user_id);

        request.validate_request()?;

        let mut habit = self.load(user_id, id).await?;
        request.apply_to(&mut habit);
        self.habit_repository.update(&habit).await?;

        info!("Habit updated: {}", id);
        Ok(())
    }

    async fn patch_habit(&self, user_id: &UserId, id: &HabitId, document: PatchDocument) -> DevHabitResult<()> {
        debug!("Patching habit {} with {} operation(s)", id, document.len());

        let mut habit = self.load(user_id, id).await?;
        let patched = apply_patch(&HabitPatchTarget::from(&habit), &document)?;

        habit.rename(patched.name, patched.description);
        self.habit_repository.update(&habit).await?;

        info!("Habit patched: {}", id);
        Ok(())
    }

    async fn delete_habit(&self, user_id: &UserId, id: &HabitId) -> DevHabitResult<()> {
        debug!("Deleting habit {} for user {}", id, user_id);

        if !self.habit_repository.delete(user_id, id).await? {
            return Err(DevHabitError::not_found("Habit", id));
        }

        info!("Habit deleted: {}", id);
        Ok(())
    }
}

impl std::fmt::Debug for HabitServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HabitServiceComponent").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{FrequencyDto, TargetDto};
    use crate::sort_mappings::sort_mapping_provider;
    use devhabit_core::{FrequencyType, HabitStatus, HabitType};
    use devhabit_repository::MemoryStore;
    use serde_json::json;

    fn service() -> HabitServiceComponent {
        HabitServiceComponent::new(Arc::new(MemoryStore::new()), Arc::new(sort_mapping_provider()))
    }

    fn create_request(name: &str, habit_type: HabitType, times: i32) -> CreateHabitRequest {
        let unit = if habit_type == HabitType::Binary { "sessions" } else { "minutes" };
        CreateHabitRequest {
            name: name.to_string(),
            description: None,
            habit_type,
            frequency: FrequencyDto {
                frequency_type: FrequencyType::Daily,
                times_per_period: times,
            },
            target: TargetDto {
                value: 10,
                unit: unit.to_string(),
            },
            end_date: None,
            milestone: None,
        }
    }

    fn user() -> UserId {
        UserId::from("u_owner")
    }

    #[tokio::test]
    async fn test_create_and_get_habit() {
        let service = service();
        let habit = service
            .create_habit(&user(), create_request("Read Books", HabitType::Measurable, 1))
            .await
            .unwrap();
        assert_eq!(habit.status, HabitStatus::Ongoing);

        let (found, tags) = service.get_habit(&user(), &habit.id, None, ApiVersion::V1).await.unwrap();
        assert_eq!(found.id, habit.id);
        assert!(tags.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_request() {
        let service = service();
        let err = service
            .create_habit(&user(), create_request("ab", HabitType::Measurable, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DevHabitError::InvalidFields(_)));
    }

    #[tokio::test]
    async fn test_get_habits_pages() {
        let service = service();
        for i in 0..25 {
            service
                .create_habit(&user(), create_request(&format!("Habit {i:02}"), HabitType::Measurable, 1))
                .await
                .unwrap();
        }

        let query = HabitsQuery {
            sort: Some("name".to_string()),
            page: Some(3),
            page_size: Some(10),
            ..HabitsQuery::default()
        };
        let page = service.get_habits(&user(), &query, ApiVersion::V1).await.unwrap();
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total_count, 25);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_previous_page);
        assert!(!page.has_next_page);
        assert_eq!(page.items[0].name, "Habit 20");
    }

    #[tokio::test]
    async fn test_sort_name_desc_then_type() {
        let service = service();
        service
            .create_habit(&user(), create_request("Alpha", HabitType::Measurable, 1))
            .await
            .unwrap();
        service
            .create_habit(&user(), create_request("Beta", HabitType::Measurable, 1))
            .await
            .unwrap();
        service
            .create_habit(&user(), create_request("Beta", HabitType::Binary, 1))
            .await
            .unwrap();

        let query = HabitsQuery {
            sort: Some("-name,type".to_string()),
            ..HabitsQuery::default()
        };
        let page = service.get_habits(&user(), &query, ApiVersion::V1).await.unwrap();
        let order: Vec<_> = page.items.iter().map(|h| (h.name.as_str(), h.habit_type)).collect();
        assert_eq!(
            order,
            vec![
                ("Beta", HabitType::Binary),
                ("Beta", HabitType::Measurable),
                ("Alpha", HabitType::Measurable)
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_sort_and_fields_are_rejected() {
        let service = service();
        let query = HabitsQuery {
            sort: Some("name,bogusField".to_string()),
            ..HabitsQuery::default()
        };
        let err = service.get_habits(&user(), &query, ApiVersion::V1).await.unwrap_err();
        assert_eq!(err.to_string(), "The provided sort parameter isn't valid: 'name,bogusField'");

        let query = HabitsQuery {
            fields: Some("name,secret".to_string()),
            ..HabitsQuery::default()
        };
        let err = service.get_habits(&user(), &query, ApiVersion::V1).await.unwrap_err();
        assert_eq!(err.to_string(), "The provided data shaping fields aren't valid: 'name,secret'");
    }

    #[tokio::test]
    async fn test_sort_names_depend_on_version() {
        let service = service();
        let query = HabitsQuery {
            sort: Some("createdAt".to_string()),
            ..HabitsQuery::default()
        };
        assert!(service.get_habits(&user(), &query, ApiVersion::V1).await.is_err());
        assert!(service.get_habits(&user(), &query, ApiVersion::V2).await.is_ok());
    }

    #[tokio::test]
    async fn test_filter_by_type_and_search() {
        let service = service();
        service
            .create_habit(&user(), create_request("Morning Run", HabitType::Binary, 1))
            .await
            .unwrap();
        service
            .create_habit(&user(), create_request("Evening Read", HabitType::Measurable, 1))
            .await
            .unwrap();

        let query = HabitsQuery {
            search: Some("MORNING".to_string()),
            habit_type: Some(HabitType::Binary),
            ..HabitsQuery::default()
        };
        let page = service.get_habits(&user(), &query, ApiVersion::V1).await.unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].name, "Morning Run");
    }

    #[tokio::test]
    async fn test_patch_only_touches_name_and_description() {
        let service = service();
        let habit = service
            .create_habit(&user(), create_request("Read Books", HabitType::Measurable, 1))
            .await
            .unwrap();

        let document: PatchDocument = serde_json::from_value(json!([
            {"op": "replace", "path": "/name", "value": "Read Novels"},
            {"op": "add", "path": "/description", "value": "Before bed"}
        ]))
        .unwrap();
        service.patch_habit(&user(), &habit.id, document).await.unwrap();

        let (patched, _) = service.get_habit(&user(), &habit.id, None, ApiVersion::V1).await.unwrap();
        assert_eq!(patched.name, "Read Novels");
        assert_eq!(patched.description.as_deref(), Some("Before bed"));
        assert_eq!(patched.frequency, habit.frequency);
        assert!(patched.updated_at_utc.is_some());
    }

    #[tokio::test]
    async fn test_habits_are_scoped_to_owner() {
        let service = service();
        let habit = service
            .create_habit(&user(), create_request("Read Books", HabitType::Measurable, 1))
            .await
            .unwrap();
        let stranger = UserId::from("u_stranger");

        let err = service
            .get_habit(&stranger, &habit.id, None, ApiVersion::V1)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), format!("Habit with ID '{}' not found.", habit.id));
        assert_eq!(
            service.delete_habit(&stranger, &habit.id).await.unwrap_err().status_code(),
            404
        );
        service.delete_habit(&user(), &habit.id).await.unwrap();
    }
}
