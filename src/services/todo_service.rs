use std::sync::Arc;

use tracing::{info, warn};

use crate::database::models::{Page, PageRequest, SearchFilters, TodoDraft, TodoId, TodoItem};
use crate::database::store::TodoStore;
use crate::security::{can_access, scope_for_list, Identity};

use super::error::{ServiceError, ServiceResult};
use super::todo_query::TodoQueryDispatcher;

/// Ownership-checked TODO operations.
///
/// Existence is always checked before ownership, so a missing id is
/// reported as not found to every caller.
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
    queries: TodoQueryDispatcher,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self {
            queries: TodoQueryDispatcher::new(store.clone()),
            store,
        }
    }

    pub fn queries(&self) -> &TodoQueryDispatcher {
        &self.queries
    }

    pub async fn list_all(&self, identity: &Identity, window: &PageRequest) -> ServiceResult<Page<TodoItem>> {
        self.queries
            .dispatch(&SearchFilters::default(), &scope_for_list(identity), window)
            .await
    }

    pub async fn create(&self, identity: &Identity, draft: TodoDraft) -> ServiceResult<TodoId> {
        let id = self.store.insert(draft.owned_by(identity.name.as_str())).await?;
        info!("User '{}' created todo {}", identity.name, id);
        Ok(id)
    }

    pub async fn get(&self, identity: &Identity, id: TodoId) -> ServiceResult<TodoItem> {
        self.load_accessible(identity, id, "get").await
    }

    /// Stores the draft under `id`, or creates a new record when `id` does
    /// not exist. Returns the id the draft ended up stored under.
    pub async fn update(&self, identity: &Identity, id: TodoId, draft: TodoDraft) -> ServiceResult<TodoId> {
        let Some(existing) = self.store.get(id).await? else {
            info!("Todo {} does not exist, creating it for '{}'", id, identity.name);
            return self.create(identity, draft).await;
        };
        self.check_access(identity, &existing, "update")?;

        let updated = draft.stored_as(id, existing.owner_name);
        if !self.store.update(&updated).await? {
            return Err(ServiceError::not_found(format!("Todo {} not found", id)));
        }
        Ok(id)
    }

    pub async fn delete(&self, identity: &Identity, id: TodoId) -> ServiceResult<()> {
        self.load_accessible(identity, id, "delete").await?;
        if !self.store.delete(id).await? {
            return Err(ServiceError::not_found(format!("Todo {} not found", id)));
        }
        info!("User '{}' deleted todo {}", identity.name, id);
        Ok(())
    }

    async fn load_accessible(&self, identity: &Identity, id: TodoId, action: &str) -> ServiceResult<TodoItem> {
        let item = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Todo {} not found", id)))?;
        self.check_access(identity, &item, action)?;
        Ok(item)
    }

    fn check_access(&self, identity: &Identity, item: &TodoItem, action: &str) -> ServiceResult<()> {
        if can_access(identity, item) {
            return Ok(());
        }
        warn!("User '{}' denied {} on todo {}", identity.name, action, item.id);
        Err(ServiceError::forbidden(format!(
            "User {} tried to {} todo {} which does not belong to them",
            identity.name, action, item.id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::InMemoryTodoStore;

    fn service() -> (TodoService, Arc<InMemoryTodoStore>) {
        let store = Arc::new(InMemoryTodoStore::new());
        (TodoService::new(store.clone()), store)
    }

    fn draft(name: &str) -> TodoDraft {
        TodoDraft {
            name: name.to_string(),
            priority: Some("high".to_string()),
            description: Some("details".to_string()),
            completed: false,
        }
    }

    #[tokio::test]
    async fn create_then_get_assigns_owner_and_id() {
        let (service, _) = service();
        let alice = Identity::user("alice");

        let id = service.create(&alice, draft("write docs")).await.unwrap();
        let item = service.get(&alice, id).await.unwrap();

        assert_eq!(item, draft("write docs").stored_as(id, "alice"));
    }

    #[tokio::test]
    async fn get_of_foreign_item_is_forbidden_with_diagnostic() {
        let (service, _) = service();
        let id = service.create(&Identity::user("bob"), draft("secret")).await.unwrap();

        match service.get(&Identity::user("alice"), id).await {
            Err(ServiceError::Forbidden(msg)) => {
                assert!(msg.contains("alice"));
                assert!(msg.contains(&id.to_string()));
                assert!(!msg.contains("secret"));
            }
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn admin_can_read_any_item() {
        let (service, _) = service();
        let id = service.create(&Identity::user("bob"), draft("b")).await.unwrap();
        let item = service.get(&Identity::admin("root"), id).await.unwrap();
        assert_eq!(item.owner_name, "bob");
    }

    #[tokio::test]
    async fn missing_ids_are_not_found_before_forbidden() {
        let (service, _) = service();
        let stranger = Identity::user("mallory");

        assert!(matches!(service.get(&stranger, 99).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(service.delete(&stranger, 99).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_keeps_stored_owner() {
        let (service, store) = service();
        let id = service.create(&Identity::user("alice"), draft("old")).await.unwrap();

        // an admin edits alice's item; ownership must not move to the admin
        let stored_id = service
            .update(&Identity::admin("root"), id, draft("new"))
            .await
            .unwrap();

        assert_eq!(stored_id, id);
        let item = store.get(id).await.unwrap().unwrap();
        assert_eq!(item.name, "new");
        assert_eq!(item.owner_name, "alice");
    }

    #[tokio::test]
    async fn update_of_missing_id_creates_new_record() {
        let (service, store) = service();
        let alice = Identity::user("alice");
        service.create(&alice, draft("first")).await.unwrap();

        let new_id = service.update(&alice, 500, draft("second")).await.unwrap();

        assert_ne!(new_id, 500);
        assert!(store.get(500).await.unwrap().is_none());
        let created = store.get(new_id).await.unwrap().unwrap();
        assert_eq!(created, draft("second").stored_as(new_id, "alice"));
    }

    #[tokio::test]
    async fn update_of_foreign_item_is_forbidden_and_leaves_it_untouched() {
        let (service, store) = service();
        let id = service.create(&Identity::user("bob"), draft("bob's")).await.unwrap();

        let result = service.update(&Identity::user("alice"), id, draft("hijacked")).await;

        assert!(matches!(result, Err(ServiceError::Forbidden(_))));
        assert_eq!(store.get(id).await.unwrap().unwrap().name, "bob's");
    }

    #[tokio::test]
    async fn delete_checks_ownership() {
        let (service, store) = service();
        let id = service.create(&Identity::user("bob"), draft("b")).await.unwrap();

        assert!(matches!(
            service.delete(&Identity::user("alice"), id).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(store.get(id).await.unwrap().is_some());

        service.delete(&Identity::user("bob"), id).await.unwrap();
        assert!(store.get(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_all_is_scoped_by_role() {
        let (service, _) = service();
        service.create(&Identity::user("alice"), draft("a1")).await.unwrap();
        service.create(&Identity::user("alice"), draft("a2")).await.unwrap();
        service.create(&Identity::user("bob"), draft("b1")).await.unwrap();
        let window = PageRequest::new(0, 10);

        let mine = service.list_all(&Identity::user("alice"), &window).await.unwrap();
        assert_eq!(mine.total_elements, 2);
        assert!(mine.content.iter().all(|t| t.owner_name == "alice"));

        let everything = service.list_all(&Identity::admin("root"), &window).await.unwrap();
        assert_eq!(everything.total_elements, 3);
    }
}
