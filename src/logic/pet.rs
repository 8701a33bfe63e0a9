use crate::error::{DomainError, DomainResult};
use crate::logic::{ensure_user_exists, found, paginate};
use crate::model::{Id, ListQuery, NewPet, Paginated, Pet, PetChanges, PetFilter};
use crate::store::traits::{PetStore, UserStore};

pub struct PetOperations;

impl PetOperations {
    pub async fn create<S: PetStore + UserStore>(store: &S, pet: NewPet) -> DomainResult<Pet> {
        ensure_user_exists(store, pet.owner_id).await?;
        Ok(store.create_pet(pet).await?)
    }

    pub async fn list<S: PetStore>(
        store: &S,
        query: ListQuery<PetFilter>,
    ) -> DomainResult<Paginated<Pet>> {
        paginate(
            query.page,
            store.list_pets(&query.filter, query.page.into()),
            store.count_pets(&query.filter),
        )
        .await
    }

    pub async fn get<S: PetStore>(store: &S, id: Id) -> DomainResult<Pet> {
        found("Pet", id, store.get_pet(id).await?)
    }

    pub async fn update<S: PetStore>(store: &S, id: Id, changes: PetChanges) -> DomainResult<Pet> {
        let existing = Self::get(store, id).await?;
        if changes.is_empty() {
            return Ok(existing);
        }
        found("Pet", id, store.update_pet(id, changes).await?)
    }

    pub async fn delete<S: PetStore>(store: &S, id: Id) -> DomainResult<Pet> {
        let existing = Self::get(store, id).await?;
        if !store.delete_pet(id).await? {
            return Err(DomainError::not_found("Pet", id));
        }
        Ok(existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::testing::store_with_user;
    use crate::model::PageRequest;

    #[tokio::test]
    async fn test_rarity_filter_with_paging() {
        let (store, user) = store_with_user("keeper").await;
        for i in 0..8 {
            let rarity = if i % 2 == 0 { "legendary" } else { "common" };
            PetOperations::create(
                &store,
                NewPet {
                    pet_name: format!("Pet {}", i),
                    rarity: rarity.to_string(),
                    owner_id: user.id,
                },
            )
            .await
            .unwrap();
        }
        let page = PetOperations::list(
            &store,
            ListQuery {
                page: PageRequest::new(2, 3),
                filter: PetFilter {
                    rarity: Some("legendary".to_string()),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap();
        assert_eq!(page.pagination.total_items, 4);
        assert_eq!(page.pagination.total_pages, 2);
        assert_eq!(page.items.len(), 1);
        assert!(page.items.iter().all(|pet| pet.rarity == "legendary"));
    }

    #[tokio::test]
    async fn test_rename_pet() {
        let (store, user) = store_with_user("keeper").await;
        let pet = PetOperations::create(
            &store,
            NewPet {
                pet_name: "Sparky".to_string(),
                rarity: "rare".to_string(),
                owner_id: user.id,
            },
        )
        .await
        .unwrap();
        let renamed = PetOperations::update(
            &store,
            pet.id,
            PetChanges {
                pet_name: Some("Sparky II".to_string()),
                rarity: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(renamed.pet_name, "Sparky II");
        assert_eq!(renamed.rarity, "rare");
        assert_eq!(renamed.owner.id, user.id);
    }
}
