use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);
    };
}

id_newtype!(UserId);

/// A user as stored by the service and mirrored by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    #[serde(rename = "correoElectronico")]
    pub email: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "edad")]
    pub age: u32,
}

/// A user that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    #[serde(rename = "correoElectronico")]
    pub email: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "edad")]
    pub age: u32,
}

impl NewUser {
    pub fn with_id(self, id: UserId) -> UserRecord {
        UserRecord {
            id,
            email: self.email,
            name: self.name,
            age: self.age,
        }
    }
}

impl From<&UserRecord> for NewUser {
    fn from(value: &UserRecord) -> Self {
        Self {
            email: value.email.clone(),
            name: value.name.clone(),
            age: value.age,
        }
    }
}
