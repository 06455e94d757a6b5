use bookstore_core::{BookCatalog, CatalogError, NewBook, Storage, StoreCatalog};

#[test]
fn create_persists_book_with_optional_fields() {
    let storage = Storage::in_memory().unwrap();
    let books = BookCatalog::with_storage(&storage);

    let created = books
        .create(
            NewBook::titled("L'Étranger")
                .with_author("Albert Camus")
                .with_external_id("978-2070360024")
                .with_year(1942),
        )
        .unwrap();

    let loaded = books.get(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.author.as_deref(), Some("Albert Camus"));
    assert_eq!(loaded.external_id.as_deref(), Some("978-2070360024"));
    assert_eq!(loaded.year, Some(1942));
    assert!(loaded.created_at > 0);
}

#[test]
fn create_rejects_empty_title_without_writing() {
    let storage = Storage::in_memory().unwrap();
    let books = BookCatalog::with_storage(&storage);

    let err = books.create(NewBook::titled("")).unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));
    assert!(books.find_by_title_substring("").unwrap().is_empty());
}

#[test]
fn create_does_not_deduplicate_and_reports_conflict() {
    let storage = Storage::in_memory().unwrap();
    let books = BookCatalog::with_storage(&storage);
    books.create(NewBook::titled("Foo")).unwrap();

    let err = books.create(NewBook::titled("FOO")).unwrap_err();
    assert!(matches!(err, CatalogError::Conflict(_)));
    assert!(!err.is_storage_failure());
}

#[test]
fn find_exact_title_ignores_case_including_accents() {
    let storage = Storage::in_memory().unwrap();
    let books = BookCatalog::with_storage(&storage);
    let created = books.create(NewBook::titled("L'Étranger")).unwrap();

    let found = books.find_exact_title("l'ÉTRANGER").unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert!(books.find_exact_title("L'Étrange").unwrap().is_none());
}

#[test]
fn substring_search_matches_title_or_author_sorted_by_title() {
    let storage = Storage::in_memory().unwrap();
    let books = BookCatalog::with_storage(&storage);
    books
        .create(NewBook::titled("Les Misérables").with_author("Victor Hugo"))
        .unwrap();
    books
        .create(NewBook::titled("Le Petit Prince").with_author("Antoine de Saint-Exupéry"))
        .unwrap();
    books
        .create(NewBook::titled("L'Étranger").with_author("Albert Camus"))
        .unwrap();

    let by_title = books.find_by_title_substring("pri").unwrap();
    let titles: Vec<_> = by_title.iter().map(|book| book.title.as_str()).collect();
    assert_eq!(titles, vec!["Le Petit Prince"]);

    let by_author = books.find_by_title_substring("HUGO").unwrap();
    assert_eq!(by_author.len(), 1);
    assert_eq!(by_author[0].title, "Les Misérables");

    let all = books.find_by_title_substring("").unwrap();
    let titles: Vec<_> = all.iter().map(|book| book.title.as_str()).collect();
    assert_eq!(titles, vec!["L'Étranger", "Le Petit Prince", "Les Misérables"]);
}

#[test]
fn substring_search_treats_wildcards_literally() {
    let storage = Storage::in_memory().unwrap();
    let books = BookCatalog::with_storage(&storage);
    books.create(NewBook::titled("100% Rust")).unwrap();
    books.create(NewBook::titled("100 Recettes")).unwrap();

    let hits = books.find_by_title_substring("100%").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "100% Rust");
    assert!(books.find_by_title_substring("_").unwrap().is_empty());
}

#[test]
fn substring_search_accepts_terms_longer_than_any_title() {
    let storage = Storage::in_memory().unwrap();
    let books = BookCatalog::with_storage(&storage);
    books.create(NewBook::titled("aaa")).unwrap();

    let term = "a".repeat(60_000);
    assert!(books.find_by_title_substring(&term).unwrap().is_empty());
}

#[test]
fn removing_a_book_cascades_to_every_store() {
    let storage = Storage::in_memory().unwrap();
    let catalog = StoreCatalog::with_storage(&storage);
    let first = catalog.create("CGI", "Toulouse").unwrap();
    let second = catalog.create("Annexe", "Blagnac").unwrap();

    let book = catalog
        .add(first.id, NewBook::titled("Le Petit Prince"))
        .unwrap()
        .book()
        .clone();
    catalog
        .add(second.id, NewBook::titled("Le Petit Prince"))
        .unwrap();
    catalog
        .add(second.id, NewBook::titled("L'Étranger"))
        .unwrap();

    assert!(catalog.books().remove(book.id).unwrap());

    assert!(catalog.list_books(first.id).unwrap().is_empty());
    let remaining: Vec<_> = catalog
        .list_books(second.id)
        .unwrap()
        .into_iter()
        .map(|book| book.title)
        .collect();
    assert_eq!(remaining, vec!["L'Étranger".to_string()]);
    assert!(catalog.books().get(book.id).unwrap().is_none());
}

#[test]
fn removing_unknown_book_is_a_no_op() {
    let storage = Storage::in_memory().unwrap();
    let books = BookCatalog::with_storage(&storage);
    assert!(!books.remove(404).unwrap());
}
