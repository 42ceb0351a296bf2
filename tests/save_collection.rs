use promptwise_be::db::{
    self, AuthContext, CollectionEntry, Flashcard, IndexLookup, SaveError,
    create_tables_in_database, save_collection,
};
use sqlx::postgres::PgPool;

fn card(front: &str, back: &str) -> Flashcard {
    Flashcard {
        front: front.to_string(),
        back: back.to_string(),
    }
}

fn chapter_one() -> Vec<Flashcard> {
    vec![card("Q1", "A1"), card("Q2", "A2")]
}

#[sqlx::test]
async fn distinct_names_both_land_in_the_index(pool: PgPool) -> sqlx::Result<()> {
    create_tables_in_database(&pool).await?;
    let auth = AuthContext::signed_in("u1");

    save_collection(&auth, "Chapter 1", &chapter_one(), &pool)
        .await
        .expect("first save should succeed");
    save_collection(&auth, "Chapter 2", &[card("Q3", "A3")], &pool)
        .await
        .expect("second save should succeed");

    let index = CollectionEntry::user_collections("u1", &pool).await?;
    let names: Vec<&str> = index.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Chapter 1", "Chapter 2"]);
    Ok(())
}

#[sqlx::test]
async fn duplicate_name_is_rejected_and_leaves_everything_unchanged(
    pool: PgPool,
) -> sqlx::Result<()> {
    create_tables_in_database(&pool).await?;
    let auth = AuthContext::signed_in("u1");

    save_collection(&auth, "Chapter 1", &chapter_one(), &pool)
        .await
        .expect("first save should succeed");
    let res = save_collection(&auth, "Chapter 1", &[card("other", "cards")], &pool).await;
    assert!(matches!(res, Err(SaveError::DuplicateName)));

    // Prior state is untouched: one index entry, the original cards.
    let index = CollectionEntry::user_collections("u1", &pool).await?;
    assert_eq!(index.len(), 1);
    let cards = db::collection_cards("u1", "Chapter 1", &pool).await?;
    assert_eq!(cards, chapter_one());
    Ok(())
}

#[sqlx::test]
async fn duplicate_check_uses_the_trimmed_name(pool: PgPool) -> sqlx::Result<()> {
    create_tables_in_database(&pool).await?;
    let auth = AuthContext::signed_in("u1");

    save_collection(&auth, "  Chapter 1  ", &chapter_one(), &pool)
        .await
        .expect("save should succeed");
    let res = save_collection(&auth, "Chapter 1", &chapter_one(), &pool).await;
    assert!(matches!(res, Err(SaveError::DuplicateName)));

    // Case still matters: a differently-cased name is a new collection.
    save_collection(&auth, "chapter 1", &chapter_one(), &pool)
        .await
        .expect("differently-cased name should be accepted");
    Ok(())
}

#[sqlx::test]
async fn blank_name_is_rejected_before_any_write(pool: PgPool) -> sqlx::Result<()> {
    create_tables_in_database(&pool).await?;
    let auth = AuthContext::signed_in("u1");

    let res = save_collection(&auth, "   ", &chapter_one(), &pool).await;
    assert!(matches!(res, Err(SaveError::InvalidName)));

    let index = CollectionEntry::user_collections("u1", &pool).await?;
    assert!(index.is_empty());
    let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM flashcard")
        .fetch_one(&pool)
        .await?;
    assert_eq!(orphans, 0);
    Ok(())
}

#[sqlx::test]
async fn concurrent_same_name_saves_have_exactly_one_winner(pool: PgPool) -> sqlx::Result<()> {
    create_tables_in_database(&pool).await?;
    let auth = AuthContext::signed_in("u1");

    let cards_a = chapter_one();
    let cards_b = [card("Q9", "A9")];
    let (a, b) = tokio::join!(
        save_collection(&auth, "Chapter 1", &cards_a, &pool),
        save_collection(&auth, "Chapter 1", &cards_b, &pool),
    );
    let winners = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one save should win: {a:?} / {b:?}");
    for res in [a, b] {
        if let Err(err) = res {
            assert!(matches!(err, SaveError::DuplicateName), "loser got {err}");
        }
    }

    let index = CollectionEntry::user_collections("u1", &pool).await?;
    assert_eq!(index.len(), 1);
    Ok(())
}

#[sqlx::test]
async fn concurrent_distinct_names_both_succeed(pool: PgPool) -> sqlx::Result<()> {
    create_tables_in_database(&pool).await?;
    let auth = AuthContext::signed_in("u1");

    let cards_a = chapter_one();
    let cards_b = chapter_one();
    let (a, b) = tokio::join!(
        save_collection(&auth, "Chapter 1", &cards_a, &pool),
        save_collection(&auth, "Chapter 2", &cards_b, &pool),
    );
    a.expect("first save should succeed");
    b.expect("second save should succeed");

    let index = CollectionEntry::user_collections("u1", &pool).await?;
    let mut names: Vec<&str> = index.iter().map(|e| e.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, ["Chapter 1", "Chapter 2"]);
    Ok(())
}

#[sqlx::test]
async fn saved_cards_read_back_in_original_order(pool: PgPool) -> sqlx::Result<()> {
    create_tables_in_database(&pool).await?;
    let auth = AuthContext::signed_in("u1");

    save_collection(&auth, "Chapter 1", &chapter_one(), &pool)
        .await
        .expect("save should succeed");

    let cards = db::collection_cards("u1", "Chapter 1", &pool).await?;
    assert_eq!(cards, chapter_one());
    Ok(())
}

#[sqlx::test]
async fn empty_card_list_still_creates_the_collection(pool: PgPool) -> sqlx::Result<()> {
    create_tables_in_database(&pool).await?;
    let auth = AuthContext::signed_in("u1");

    save_collection(&auth, "Empty Deck", &[], &pool)
        .await
        .expect("save should succeed");

    let index = CollectionEntry::user_collections("u1", &pool).await?;
    assert_eq!(index.len(), 1);
    assert!(matches!(
        CollectionEntry::lookup("u1", "Empty Deck", &pool).await?,
        IndexLookup::Found(_)
    ));
    let cards = db::collection_cards("u1", "Empty Deck", &pool).await?;
    assert!(cards.is_empty());
    Ok(())
}

#[sqlx::test]
async fn url_special_names_save_and_read_back(pool: PgPool) -> sqlx::Result<()> {
    create_tables_in_database(&pool).await?;
    let auth = AuthContext::signed_in("u1");

    for name in ["AC/DC basics", "what?", "#1"] {
        save_collection(&auth, name, &chapter_one(), &pool)
            .await
            .unwrap_or_else(|err| panic!("saving {name:?} should succeed: {err}"));
        assert!(matches!(
            CollectionEntry::lookup("u1", name, &pool).await?,
            IndexLookup::Found(_)
        ));
        assert_eq!(db::collection_cards("u1", name, &pool).await?, chapter_one());
    }
    Ok(())
}

#[sqlx::test]
async fn collections_are_scoped_per_user(pool: PgPool) -> sqlx::Result<()> {
    create_tables_in_database(&pool).await?;

    save_collection(&AuthContext::signed_in("u1"), "Chapter 1", &chapter_one(), &pool)
        .await
        .expect("u1's save should succeed");
    save_collection(
        &AuthContext::signed_in("u2"),
        "Chapter 1",
        &[card("Q9", "A9")],
        &pool,
    )
    .await
    .expect("u2 may reuse the name");

    assert_eq!(CollectionEntry::user_collections("u1", &pool).await?.len(), 1);
    assert_eq!(
        db::collection_cards("u2", "Chapter 1", &pool).await?,
        [card("Q9", "A9")]
    );
    Ok(())
}
