mod _support;

use _support::{Post, User, rec};
use filelite::Database;
use filelite::errors::DbError;
use filelite::model::Model;
use filelite::query::Query;
use filelite::relation::Relation;
use serde_json::json;
use tempfile::tempdir;

#[test]
fn has_many_returns_matching_posts_in_order() {
    let dir = tempdir().unwrap();
    let db = Database::open(dir.path());
    let users = db.collection("users").unwrap();
    // Push the next id to 5.
    users.write_all(&[rec(json!({"id": 4, "name": "seed"}))]).unwrap();
    let user: User = db.create(rec(json!({"name": "Charlie"}))).unwrap();
    assert_eq!(user.id(), Some(5));

    let posts = db.collection("posts").unwrap();
    posts.insert(rec(json!({"title": "P1", "user_id": 5}))).unwrap();
    posts.insert(rec(json!({"title": "other", "user_id": 4}))).unwrap();
    posts.insert(rec(json!({"title": "P2", "user_id": "5"}))).unwrap();
    posts.insert(rec(json!({"title": "orphan"}))).unwrap();

    let found: Vec<Post> = db.has_many::<User, Post>(&user, None).unwrap();
    let titles: Vec<_> = found.iter().map(|p| p.get_attribute("title").cloned().unwrap()).collect();
    assert_eq!(titles, vec![json!("P1"), json!("P2")]);
}

#[test]
fn has_one_returns_first_match() {
    let dir = tempdir().unwrap();
    let db = Database::open(dir.path());
    let user: User = db.create(rec(json!({"name": "Single"}))).unwrap();
    db.create::<Post>(rec(json!({"title": "Only Post", "user_id": 1}))).unwrap();
    db.create::<Post>(rec(json!({"title": "Second", "user_id": 1}))).unwrap();
    let post: Post = db.has_one::<User, Post>(&user, None).unwrap().unwrap();
    assert_eq!(post.get_attribute("title"), Some(&json!("Only Post")));

    let lonely: User = db.create(rec(json!({"name": "Lonely"}))).unwrap();
    assert!(db.has_one::<User, Post>(&lonely, None).unwrap().is_none());
}

#[test]
fn has_many_without_id_is_precondition_error() {
    let dir = tempdir().unwrap();
    let db = Database::open(dir.path());
    let ghost = User::from_record(rec(json!({"name": "ghost"})));
    let err = db.has_many::<User, Post>(&ghost, None).err().unwrap();
    assert!(matches!(err, DbError::MissingId { .. }));
    assert!(err.is_precondition());
    let err = db.has_one::<User, Post>(&ghost, None).err().unwrap();
    assert!(matches!(err, DbError::MissingId { .. }));
}

#[test]
fn belongs_to_with_explicit_key() {
    let dir = tempdir().unwrap();
    let db = Database::open(dir.path());
    let user: User = db.create(rec(json!({"name": "Explicit"}))).unwrap();
    let post: Post = db.create(rec(json!({"title": "Explicit FK", "custom_user_id": 1}))).unwrap();

    let owner: User = db.belongs_to::<Post, User>(&post, Some("custom_user_id")).unwrap().unwrap();
    assert_eq!(owner.get_attribute("name"), Some(&json!("Explicit")));

    let posts: Vec<Post> = db.has_many::<User, Post>(&user, Some("custom_user_id")).unwrap();
    assert_eq!(posts.len(), 1);
}

#[test]
fn belongs_to_default_key_comes_from_own_type() {
    let dir = tempdir().unwrap();
    let db = Database::open(dir.path());
    db.create::<User>(rec(json!({"name": "Auto"}))).unwrap();
    // Default key for a Post is `post_id`, so a post carrying only `user_id` has none.
    let post: Post = db.create(rec(json!({"title": "AutoFK", "user_id": 1}))).unwrap();
    let err = db.belongs_to::<Post, User>(&post, None).err().unwrap();
    match err {
        DbError::MissingForeignKey { key, collection } => {
            assert_eq!(key, "post_id");
            assert_eq!(collection, "posts");
        }
        other => panic!("unexpected error: {other}"),
    }
    let tagged: Post = db.create(rec(json!({"title": "tagged", "post_id": 1}))).unwrap();
    let owner: Option<User> = db.belongs_to::<Post, User>(&tagged, None).unwrap();
    assert_eq!(owner.unwrap().get_attribute("name"), Some(&json!("Auto")));
}

#[test]
fn belongs_to_missing_key_errors_but_null_key_is_none() {
    let dir = tempdir().unwrap();
    let db = Database::open(dir.path());
    db.create::<User>(rec(json!({"name": "NoRelation"}))).unwrap();

    let typo: Post = db.create(rec(json!({"title": "Bad Post", "userd_id": 1}))).unwrap();
    let err = db.belongs_to::<Post, User>(&typo, Some("user_id")).err().unwrap();
    assert!(matches!(err, DbError::MissingForeignKey { .. }));

    let empty: Post = db.create(rec(json!({"title": "No User Post", "user_id": null}))).unwrap();
    assert!(db.belongs_to::<Post, User>(&empty, Some("user_id")).unwrap().is_none());

    let zero: Post = db.create(rec(json!({"title": "Zero", "user_id": 0}))).unwrap();
    assert!(db.belongs_to::<Post, User>(&zero, Some("user_id")).unwrap().is_none());

    let dangling: Post = db.create(rec(json!({"title": "Dangling", "user_id": 99}))).unwrap();
    assert!(db.belongs_to::<Post, User>(&dangling, Some("user_id")).unwrap().is_none());
}

#[test]
fn relation_over_raw_records() {
    let dir = tempdir().unwrap();
    let db = Database::open(dir.path());
    let author = db.collection("authors").unwrap().insert(rec(json!({"name": "Ann"}))).unwrap();
    let books = db.collection("books").unwrap();
    books.insert(rec(json!({"title": "One", "author_id": 1}))).unwrap();
    books.insert(rec(json!({"title": "Two", "author_id": 1}))).unwrap();

    let rel = Relation::new("Author", "authors", &author);
    assert_eq!(rel.default_foreign_key(), "author_id");
    let related = Query::open("books", db.config()).unwrap();
    let titles: Vec<String> = rel
        .has_many(related.bind(|r| r["title"].as_str().unwrap_or_default().to_string()), None)
        .unwrap();
    assert_eq!(titles, vec!["One", "Two"]);

    let book = books.find(2).unwrap().unwrap();
    let back = Relation::new("Book", "books", &book)
        .belongs_to(Query::open("authors", db.config()).unwrap(), Some("author_id"))
        .unwrap()
        .unwrap();
    assert_eq!(back["name"], "Ann");
}
