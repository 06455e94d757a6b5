use bookstore_core::{AddOutcome, NewBook, Storage, StoreCatalog};
use std::sync::{Arc, Barrier};
use std::thread;

const WORKERS: usize = 8;

#[test]
fn parallel_adds_of_an_unseen_title_create_one_book_and_one_membership() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(Storage::open(dir.path().join("race.db")).unwrap());
    let store_id = StoreCatalog::with_storage(&storage)
        .create("CGI", "Toulouse")
        .unwrap()
        .id;

    let barrier = Arc::new(Barrier::new(WORKERS));
    let handles: Vec<_> = (0..WORKERS)
        .map(|worker| {
            let storage = Arc::clone(&storage);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let catalog = StoreCatalog::with_storage(&storage);
                let title = if worker % 2 == 0 { "Same Title" } else { "SAME TITLE" };
                barrier.wait();
                catalog.add(store_id, NewBook::titled(title)).unwrap()
            })
        })
        .collect();

    let outcomes: Vec<AddOutcome> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    let added = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, AddOutcome::Added { .. }))
        .count();
    assert_eq!(added, 1);
    let first_id = outcomes[0].book().id;
    assert!(outcomes.iter().all(|outcome| outcome.book().id == first_id));

    let catalog = StoreCatalog::with_storage(&storage);
    assert_eq!(catalog.list_books(store_id).unwrap().len(), 1);
    assert_eq!(
        catalog.books().find_by_title_substring("same title").unwrap().len(),
        1
    );
}

#[test]
fn parallel_adds_to_different_stores_share_one_book() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(Storage::open(dir.path().join("shared.db")).unwrap());
    let store_ids: Vec<_> = {
        let catalog = StoreCatalog::with_storage(&storage);
        (0..WORKERS)
            .map(|idx| catalog.create(&format!("Store {idx}"), "Toulouse").unwrap().id)
            .collect()
    };

    let barrier = Arc::new(Barrier::new(WORKERS));
    let handles: Vec<_> = store_ids
        .iter()
        .copied()
        .map(|store_id| {
            let storage = Arc::clone(&storage);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                StoreCatalog::with_storage(&storage)
                    .add(store_id, NewBook::titled("Le Petit Prince"))
                    .unwrap()
            })
        })
        .collect();

    let created = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .filter(|outcome| matches!(outcome, AddOutcome::Added { book_created: true, .. }))
        .count();
    assert_eq!(created, 1);

    let catalog = StoreCatalog::with_storage(&storage);
    for store_id in store_ids {
        assert_eq!(catalog.list_books(store_id).unwrap().len(), 1);
    }
    assert_eq!(catalog.books().find_by_title_substring("prince").unwrap().len(), 1);
}
