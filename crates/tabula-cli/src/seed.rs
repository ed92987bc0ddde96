//! Sample employee records written by `tabula seed`.

use serde::{Deserialize, Serialize};

/// Collection the sample records are written to.
pub const USERS: &str = "users";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub city: String,
    pub state: String,
    pub country: String,
    pub pincode: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub age: u32,
    pub contact: String,
    pub company: String,
    pub address: Address,
}

fn user(
    name: &str,
    age: u32,
    contact: &str,
    company: &str,
    (city, state, pincode): (&str, &str, u32),
) -> User {
    User {
        name: name.into(),
        age,
        contact: contact.into(),
        company: company.into(),
        address: Address {
            city: city.into(),
            state: state.into(),
            country: "India".into(),
            pincode,
        },
    }
}

pub fn employees() -> Vec<User> {
    vec![
        user("John", 23, "9832098320", "Google", ("Bangalore", "Karnataka", 410013)),
        user("Alice", 25, "9876543210", "Microsoft", ("Mumbai", "Maharashtra", 400001)),
        user("Bob", 28, "9765432109", "Amazon", ("Delhi", "Delhi", 110001)),
        user("Emma", 30, "9898765432", "Facebook", ("Hyderabad", "Telangana", 500001)),
        user("David", 35, "9876543210", "Apple", ("Pune", "Maharashtra", 411001)),
    ]
}
