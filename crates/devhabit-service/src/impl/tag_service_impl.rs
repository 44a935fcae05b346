//! Tag service implementation.

use crate::dto::{CreateTagRequest, TagDto, TagsQuery, UpdateTagRequest};
use crate::sort_mappings::{TAG_DEFAULT_ORDER, TIEBREAKER};
use crate::tag_service::TagService;
use async_trait::async_trait;
use devhabit_core::{
    DataShapingService, DevHabitError, DevHabitResult, SortMappingProvider, SortPlan, Tag, TagId, UserId, ValidateExt,
};
use devhabit_repository::TagRepository;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};

/// Tag service component for Shaku DI.
#[derive(Component)]
#[shaku(interface = TagService)]
pub struct TagServiceComponent {
    #[shaku(inject)]
    tag_repository: Arc<dyn TagRepository>,
    sort_mappings: Arc<SortMappingProvider>,
    data_shaping: DataShapingService,
}

impl TagServiceComponent {
    /// Creates the service outside of the DI container.
    #[must_use]
    pub fn new(tag_repository: Arc<dyn TagRepository>, sort_mappings: Arc<SortMappingProvider>) -> Self {
        Self {
            tag_repository,
            sort_mappings,
            data_shaping: DataShapingService::new(),
        }
    }

    fn ensure_fields(&self, fields: Option<&str>) -> DevHabitResult<()> {
        if self.data_shaping.validate::<TagDto>(fields) {
            Ok(())
        } else {
            Err(DevHabitError::invalid_fields(fields))
        }
    }

    async fn load(&self, user_id: &UserId, id: &TagId) -> DevHabitResult<Tag> {
        self.tag_repository
            .find_by_id(user_id, id)
            .await?
            .ok_or_else(|| DevHabitError::not_found("Tag", id))
    }

    async fn ensure_unique_name(&self, user_id: &UserId, name: &str) -> DevHabitResult<()> {
        if self.tag_repository.exists_by_name(user_id, name).await? {
            return Err(DevHabitError::Conflict(format!("The tag '{}' already exists", name)));
        }
        Ok(())
    }
}

#[async_trait]
impl TagService for TagServiceComponent {
    async fn get_tags(&self, user_id: &UserId, query: &TagsQuery) -> DevHabitResult<Vec<Tag>> {
        debug!("Listing tags for user {}: {:?}", user_id, query);

        let sort = query.sort.as_deref();
        if !self.sort_mappings.validate_mappings::<TagDto, Tag>(sort) {
            return Err(DevHabitError::invalid_sort(sort));
        }
        self.ensure_fields(query.fields.as_deref())?;

        let mappings = self.sort_mappings.get_mappings::<TagDto, Tag>()?;
        let plan = SortPlan::resolve(sort, mappings, TAG_DEFAULT_ORDER, TIEBREAKER)?;

        self.tag_repository.find_all(user_id, &plan).await
    }

    async fn get_tag(&self, user_id: &UserId, id: &TagId, fields: Option<&str>) -> DevHabitResult<Tag> {
        debug!("Getting tag {} for user {}", id, user_id);

        self.ensure_fields(fields)?;
        self.load(user_id, id).await
    }

    async fn create_tag(&self, user_id: &UserId, request: CreateTagRequest) -> DevHabitResult<Tag> {
        debug!("Creating tag for user {}: {}", user_id, request.name);

        request.validate_request()?;
        self.ensure_unique_name(user_id, &request.name).await?;

        let tag = request.into_tag(user_id.clone());
        self.tag_repository.insert(&tag).await?;

        info!("Tag created: {}", tag.id);
        Ok(tag)
    }

    async fn update_tag(&self, user_id: &UserId, id: &TagId, request: UpdateTagRequest) -> DevHabitResult<()> {
        debug!("Updating tag {} for user {}", id, user_id);

        request.validate_request()?;

        let mut tag = self.load(user_id, id).await?;
        if tag.name != request.name {
            self.ensure_unique_name(user_id, &request.name).await?;
        }

        tag.update(request.name, request.description);
        self.tag_repository.update(&tag).await?;

        info!("Tag updated: {}", id);
        Ok(())
    }

    async fn delete_tag(&self, user_id: &UserId, id: &TagId) -> DevHabitResult<()> {
        debug!("Deleting tag {} for user {}", id, user_id);

        if !self.tag_repository.delete(user_id, id).await? {
            return Err(DevHabitError::not_found("Tag", id));
        }

        info!("Tag deleted: {}", id);
        Ok(())
    }
}

impl std::fmt::Debug for TagServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagServiceComponent").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort_mappings::sort_mapping_provider;
    use devhabit_repository::MemoryStore;

    fn service() -> TagServiceComponent {
        TagServiceComponent::new(Arc::new(MemoryStore::new()), Arc::new(sort_mapping_provider()))
    }

    fn create(name: &str) -> CreateTagRequest {
        CreateTagRequest {
            name: name.to_string(),
            description: None,
        }
    }

    fn user() -> UserId {
        UserId::from("u_owner")
    }

    #[tokio::test]
    async fn test_tags_default_to_name_order() {
        let service = service();
        for name in ["Work", "Health", "Learning"] {
            service.create_tag(&user(), create(name)).await.unwrap();
        }

        let tags = service.get_tags(&user(), &TagsQuery::default()).await.unwrap();
        let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Health", "Learning", "Work"]);

        let query = TagsQuery {
            sort: Some("-name".to_string()),
            fields: None,
        };
        let tags = service.get_tags(&user(), &query).await.unwrap();
        assert_eq!(tags[0].name, "Work");
    }

    #[tokio::test]
    async fn test_duplicate_name_is_conflict() {
        let service = service();
        service.create_tag(&user(), create("Health")).await.unwrap();

        let err = service.create_tag(&user(), create("Health")).await.unwrap_err();
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.to_string(), "The tag 'Health' already exists");

        service.create_tag(&UserId::from("u_other"), create("Health")).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let service = service();
        let tag = service.create_tag(&user(), create("Health")).await.unwrap();

        service
            .update_tag(
                &user(),
                &tag.id,
                UpdateTagRequest {
                    name: "Fitness".to_string(),
                    description: Some("Body".to_string()),
                },
            )
            .await
            .unwrap();
        let updated = service.get_tag(&user(), &tag.id, None).await.unwrap();
        assert_eq!(updated.name, "Fitness");
        assert!(updated.updated_at_utc.is_some());

        service.delete_tag(&user(), &tag.id).await.unwrap();
        let err = service.get_tag(&user(), &tag.id, None).await.unwrap_err();
        assert_eq!(err.to_string(), format!("Tag with ID '{}' not found.", tag.id));
    }

    #[tokio::test]
    async fn test_invalid_selectors() {
        let service = service();
        let query = TagsQuery {
            sort: Some("colour".to_string()),
            fields: None,
        };
        assert_eq!(service.get_tags(&user(), &query).await.unwrap_err().status_code(), 400);

        let tag = service.create_tag(&user(), create("Health")).await.unwrap();
        let err = service.get_tag(&user(), &tag.id, Some("colour")).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
