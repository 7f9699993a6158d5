mod common;

use common::Harness;
use streamverse_client::commands::favorites;
use streamverse_client::{ClientError, Screen};

#[tokio::test]
async fn add_list_remove() {
    let h = Harness::new();
    h.sign_up("ada@example.com").await;

    let saved = favorites::add(&h.app, 550, "Fight Club", Some("/fc.jpg")).await.unwrap();
    let listed = favorites::list(&h.app).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title_id(), 550);
    assert_eq!(listed[0].id, saved.id);
    assert!(favorites::is_favorite(&h.app, 550).await.unwrap());

    favorites::remove(&h.app, &saved.id).await.unwrap();
    assert!(favorites::list(&h.app).await.unwrap().is_empty());
    assert!(!favorites::is_favorite(&h.app, 550).await.unwrap());
}

#[tokio::test]
async fn removing_twice_is_harmless() {
    let h = Harness::new();
    h.sign_up("ada@example.com").await;

    let keep = favorites::add(&h.app, 1, "Keep", None).await.unwrap();
    let gone = favorites::add(&h.app, 2, "Gone", None).await.unwrap();

    favorites::remove(&h.app, &gone.id).await.unwrap();
    let before = favorites::list(&h.app).await.unwrap();
    favorites::remove(&h.app, &gone.id).await.unwrap();
    let after = favorites::list(&h.app).await.unwrap();

    assert_eq!(before, after);
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].id, keep.id);
}

#[tokio::test]
async fn toggle_clears_duplicates() {
    let h = Harness::new();
    h.sign_up("ada@example.com").await;

    favorites::add(&h.app, 7, "Se7en", None).await.unwrap();
    favorites::add(&h.app, 7, "Se7en", None).await.unwrap();
    assert_eq!(favorites::list(&h.app).await.unwrap().len(), 2);

    let now_saved = favorites::toggle(&h.app, 7, "Se7en", None).await.unwrap();
    assert!(!now_saved);
    assert!(favorites::list(&h.app).await.unwrap().is_empty());

    let now_saved = favorites::toggle(&h.app, 7, "Se7en", None).await.unwrap();
    assert!(now_saved);
    assert_eq!(favorites::list(&h.app).await.unwrap().len(), 1);
}

#[tokio::test]
async fn favorites_are_private_to_their_owner() {
    let h = Harness::new();
    h.sign_up("ada@example.com").await;
    favorites::add(&h.app, 550, "Fight Club", None).await.unwrap();

    h.sign_out().await;
    assert!(matches!(
        favorites::list(&h.app).await,
        Err(ClientError::NotSignedIn)
    ));

    h.sign_up("bob@example.com").await;
    let nav = h.app.navigate("/favorites").await.unwrap();
    let Screen::Favorites(saved) = nav.screen else {
        panic!("expected the favorites screen");
    };
    assert!(saved.is_empty());
}
