use serde::{Deserialize, Serialize};
use tabula_store::{DocumentStore, DocumentStoreExt, FsDocumentStore, StoreError};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Address {
    city: String,
    state: String,
    country: String,
    pincode: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct User {
    name: String,
    age: u32,
    contact: String,
    company: String,
    address: Address,
}

fn user(name: &str, age: u32, company: &str, city: &str, pincode: u32) -> User {
    User {
        name: name.into(),
        age,
        contact: "9876543210".into(),
        company: company.into(),
        address: Address {
            city: city.into(),
            state: "Karnataka".into(),
            country: "India".into(),
            pincode,
        },
    }
}

#[test]
fn employee_directory_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsDocumentStore::open(dir.path().join("collections")).unwrap();

    let employees = vec![
        user("John", 23, "Google", "Bangalore", 410013),
        user("Alice", 25, "Microsoft", "Mumbai", 400001),
        user("Bob", 28, "Amazon", "Delhi", 110001),
    ];
    for e in &employees {
        store.write("users", &e.name, e).unwrap();
    }

    let john: User = store.read("users", "John").unwrap();
    assert_eq!(john.age, 23);

    let mut all: Vec<User> = store.read_all_as("users").unwrap();
    all.sort_by(|a, b| a.name.cmp(&b.name));
    let mut expected = employees.clone();
    expected.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(all, expected);

    store.delete("users", "John").unwrap();
    let err = store.read::<User>("users", "John").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    assert_eq!(store.read_all("users").unwrap().len(), 2);
}

#[test]
fn missing_keys_and_empty_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsDocumentStore::open(dir.path()).unwrap();

    assert!(matches!(
        store.read::<User>("users", "ghost").unwrap_err(),
        StoreError::NotFound(_)
    ));
    assert!(matches!(
        store.write("", "x", &1).unwrap_err(),
        StoreError::InvalidArgument(_)
    ));
}

#[test]
fn reopened_store_sees_previous_records() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("collections");
    {
        let store = FsDocumentStore::open(&root).unwrap();
        store
            .write("users", "Emma", &user("Emma", 30, "Facebook", "Hyderabad", 500001))
            .unwrap();
    }

    let store = FsDocumentStore::open(&root).unwrap();
    let emma: User = store.read("users", "Emma").unwrap();
    assert_eq!(emma.company, "Facebook");
    assert_eq!(store.collection_lock_count(), 0);
}
