use storefront_api::config::StoreSection;
use storefront_api::error::ServiceError;
use storefront_api::lifecycle::StoreSystem;
use storefront_api::model::{
    Category, CategoryCreate, Order, OrderCreate, Product, ProductCreate, ProductPatch, User,
    UserCreate,
};
use storefront_api::pagination::PageRequest;
use storefront_api::protocol::{CompositePatch, ProductRename};

fn user(name: &str) -> UserCreate {
    UserCreate {
        name: name.into(),
        email: format!("{}@example.com", name.to_lowercase()),
    }
}

fn product(name: &str, category_id: Option<u64>) -> ProductCreate {
    ProductCreate {
        name: name.into(),
        color: "blue".into(),
        category_id,
    }
}

async fn create_user(system: &StoreSystem, name: &str) -> User {
    let token = system.token_client.issue().await.expect("issue token");
    system
        .user_client
        .create(token, user(name))
        .await
        .expect("create user")
}

/// Full end-to-end flow through every client.
#[tokio::test]
async fn test_full_storefront_flow() {
    let system = StoreSystem::new(&StoreSection::default());

    let alice = create_user(&system, "Alice").await;
    assert_eq!(alice.id, 1);
    assert_eq!(alice.version, 1);

    let token = system.token_client.issue().await.unwrap();
    let tools = system
        .category_client
        .create(token, CategoryCreate {
            name: "Tools".into(),
        })
        .await
        .unwrap();

    let token = system.token_client.issue().await.unwrap();
    let hammer = system
        .product_client
        .create(token, product("Hammer", Some(tools.id)))
        .await
        .unwrap();

    let token = system.token_client.issue().await.unwrap();
    let order = system
        .order_client
        .create(token, OrderCreate {
            user_id: alice.id,
            product_id: hammer.id,
        })
        .await
        .unwrap();

    let fetched: Order = system.order_client.get(order.id).await.unwrap();
    assert_eq!(fetched.user_id, alice.id);
    assert_eq!(fetched.product_id, hammer.id);

    let in_category = system.category_client.products(tools.id).await.unwrap();
    assert_eq!(in_category, vec![hammer]);

    let stats = system.store().stats().await.unwrap();
    assert_eq!(stats.rows("Token"), 4);
    assert_eq!(stats.rows("Order"), 1);

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_token_consumed_once_under_contention() {
    let system = StoreSystem::new(&StoreSection::default());
    let token = system.token_client.issue().await.unwrap();

    let mut tasks = Vec::new();
    for i in 0..16 {
        let client = system.user_client.clone();
        let token = token.clone();
        tasks.push(tokio::spawn(async move {
            client.create(token, user(&format!("User{i}"))).await
        }));
    }

    let mut created = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => created += 1,
            Err(e) => assert_eq!(e, ServiceError::TokenAlreadyUsed),
        }
    }
    assert_eq!(created, 1);

    let stats = system.store().stats().await.unwrap();
    assert_eq!(stats.rows("User"), 1);
    let stored = system.token_client.lookup(&token).await.unwrap().unwrap();
    assert!(stored.used);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_replace_same_version() {
    let system = StoreSystem::new(&StoreSection::default());
    let alice = create_user(&system, "Alice").await;
    let id = alice.id;

    let mut tasks = Vec::new();
    for i in 0..8 {
        let client = system.user_client.clone();
        tasks.push(tokio::spawn(async move {
            client.replace(id, 1, user(&format!("Writer{i}"))).await
        }));
    }

    let mut winners = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(version) => {
                winners += 1;
                assert_eq!(version, 2);
            }
            Err(ServiceError::VersionConflict { current, .. }) => assert_eq!(current, 2),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(winners, 1);
    assert_eq!(system.user_client.get(id).await.unwrap().version, 2);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_version_counts_replaces_not_patches() {
    let system = StoreSystem::new(&StoreSection::default());
    let token = system.token_client.issue().await.unwrap();
    let lamp = system
        .product_client
        .create(token, product("Lamp", None))
        .await
        .unwrap();

    for n in 1..=5 {
        let version = system
            .product_client
            .replace(lamp.id, n, product(&format!("Lamp v{n}"), None))
            .await
            .unwrap();
        assert_eq!(version, n + 1);
    }

    let patched = system
        .product_client
        .patch(lamp.id, ProductPatch {
            color: Some("green".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(patched.version, 6);
    assert_eq!(patched.name, "Lamp v5");
    assert_eq!(patched.color, "green");

    let stale = system
        .product_client
        .replace(lamp.id, 3, product("Stale", None))
        .await;
    assert!(matches!(stale, Err(ServiceError::VersionConflict { .. })));
    assert_eq!(system.product_client.get(lamp.id).await.unwrap().name, "Lamp v5");

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_failed_create_leaves_token_unused() {
    let system = StoreSystem::new(&StoreSection::default());
    let token = system.token_client.issue().await.unwrap();

    let err = system
        .user_client
        .create(token.clone(), user(&"X".repeat(60)))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::PersistenceFailure { entity: "User", .. }));

    let stored = system.token_client.lookup(&token).await.unwrap().unwrap();
    assert!(!stored.used);

    // The same token still pays for a valid create.
    let bob = system.user_client.create(token, user("Bob")).await.unwrap();
    assert_eq!(system.user_client.get(bob.id).await.unwrap().name, "Bob");

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_delete_missing_leaves_store_unchanged() {
    let system = StoreSystem::new(&StoreSection::default());
    create_user(&system, "Alice").await;

    let before = system.store().stats().await.unwrap();
    let err = system.user_client.delete(99).await.unwrap_err();
    assert_eq!(
        err,
        ServiceError::NotFound {
            entity: "User",
            id: 99
        }
    );
    assert_eq!(system.store().stats().await.unwrap(), before);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_category_delete_detaches_products() {
    let system = StoreSystem::new(&StoreSection::default());
    let token = system.token_client.issue().await.unwrap();
    let garden = system
        .category_client
        .create(token, CategoryCreate {
            name: "Garden".into(),
        })
        .await
        .unwrap();

    let mut ids = Vec::new();
    for name in ["Rake", "Hose"] {
        let token = system.token_client.issue().await.unwrap();
        let row = system
            .product_client
            .create(token, product(name, Some(garden.id)))
            .await
            .unwrap();
        ids.push(row.id);
    }

    system.category_client.delete(garden.id).await.unwrap();

    for id in ids {
        let row: Product = system.product_client.get(id).await.unwrap();
        assert_eq!(row.category_id, None);
        assert_eq!(row.version, 1);
    }
    assert!(matches!(
        system.category_client.get(garden.id).await,
        Err(ServiceError::NotFound { .. })
    ));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_composite_patch_all_or_nothing() {
    let system = StoreSystem::new(&StoreSection::default());
    let token = system.token_client.issue().await.unwrap();
    let kitchen: Category = system
        .category_client
        .create(token, CategoryCreate {
            name: "Kitchen".into(),
        })
        .await
        .unwrap();
    let token = system.token_client.issue().await.unwrap();
    let pan = system
        .product_client
        .create(token, product("Pan", Some(kitchen.id)))
        .await
        .unwrap();

    let failed = system
        .category_client
        .patch_with_products(
            kitchen.id,
            CompositePatch {
                name: Some("Cookware".into()),
                products: Some(vec![ProductRename {
                    id: pan.id,
                    name: "P".repeat(51),
                }]),
            },
        )
        .await;
    assert!(matches!(failed, Err(ServiceError::PersistenceFailure { .. })));
    assert_eq!(system.category_client.get(kitchen.id).await.unwrap().name, "Kitchen");
    assert_eq!(system.product_client.get(pan.id).await.unwrap().name, "Pan");

    let outcome = system
        .category_client
        .patch_with_products(
            kitchen.id,
            CompositePatch {
                name: Some("Cookware".into()),
                products: Some(vec![
                    ProductRename {
                        id: pan.id,
                        name: "Skillet".into(),
                    },
                    ProductRename {
                        id: 404,
                        name: "Ghost".into(),
                    },
                ]),
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome.renamed, 1);
    assert_eq!(outcome.skipped, vec![404]);
    assert_eq!(system.category_client.get(kitchen.id).await.unwrap().name, "Cookware");
    assert_eq!(system.product_client.get(pan.id).await.unwrap().name, "Skillet");

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_list_second_page() {
    let system = StoreSystem::new(&StoreSection::default());
    for i in 1..=12 {
        create_user(&system, &format!("User{i}")).await;
    }

    let page = system
        .user_client
        .list(PageRequest {
            page: 2,
            per_page: 5,
        })
        .await
        .unwrap();
    let ids: Vec<u64> = page.items.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![6, 7, 8, 9, 10]);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.total_count, 12);

    system.shutdown().await.unwrap();
}
