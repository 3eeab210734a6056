use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::user::schema::UserEntity;

#[derive(Deserialize, Validate)]
pub struct SignUpModel {
    #[validate(length(min = 3, max = 150, message = "Username must be 3 to 150 characters"))]
    pub username: String,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 254, message = "Email must be at most 254 characters")
    )]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    #[validate(length(min = 1, max = 30, message = "First name must be 1 to 30 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 30, message = "Last name must be 1 to 30 characters"))]
    pub last_name: String,
}

#[derive(Deserialize, Validate)]
pub struct SignInModel {
    #[validate(length(min = 3, message = "Username must be at least 3 characters long"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

/// Profile edit. Absent fields are left alone; `null` clears nullable ones.
#[derive(Default, Deserialize, Validate)]
pub struct UpdateProfileModel {
    #[validate(
        email(message = "Invalid email format"),
        length(max = 254, message = "Email must be at most 254 characters")
    )]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 30, message = "First name must be 1 to 30 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 30, message = "Last name must be 1 to 30 characters"))]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    pub photo_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    pub date_of_birth: Option<Option<NaiveDate>>,
    #[validate(length(max = 250, message = "Address must be at most 250 characters"))]
    pub address: Option<String>,
    #[validate(length(max = 25, message = "Phone number must be at most 25 characters"))]
    pub phone_number: Option<String>,
}

impl UpdateProfileModel {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.photo_url.is_none()
            && self.date_of_birth.is_none()
            && self.address.is_none()
            && self.phone_number.is_none()
    }
}

#[derive(Deserialize, Validate)]
pub struct SearchQuery {
    #[serde(default)]
    #[validate(length(max = 100, message = "Search must be at most 100 characters"))]
    pub search: String,
}

pub struct InsertUser {
    pub username: String,
    pub email: String,
    pub hash_password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo_url: Option<Option<String>>,
    pub date_of_birth: Option<Option<NaiveDate>>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

impl From<UpdateProfileModel> for UpdateUser {
    fn from(model: UpdateProfileModel) -> Self {
        UpdateUser {
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            photo_url: model.photo_url,
            date_of_birth: model.date_of_birth,
            address: model.address,
            phone_number: model.phone_number,
        }
    }
}

#[derive(Serialize)]
pub struct SignUpResponse {
    pub id: uuid::Uuid,
}

#[derive(Serialize)]
pub struct SignInResponse {
    pub access_token: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UserResponse {
    pub id: uuid::Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub photo_url: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: String,
    pub phone_number: String,
}

impl From<UserEntity> for UserResponse {
    fn from(entity: UserEntity) -> Self {
        UserResponse {
            full_name: entity.full_name(),
            id: entity.id,
            username: entity.username,
            email: entity.email,
            first_name: entity.first_name,
            last_name: entity.last_name,
            photo_url: entity.photo_url,
            date_of_birth: entity.date_of_birth,
            address: entity.address,
            phone_number: entity.phone_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up(username: &str, email: &str) -> SignUpModel {
        SignUpModel {
            username: username.to_string(),
            email: email.to_string(),
            password: "password1".to_string(),
            first_name: "John".to_string(),
            last_name: "Carney".to_string(),
        }
    }

    #[test]
    fn sign_up_rejects_values_longer_than_their_columns() {
        assert!(sign_up("john", "john.carney@carneylabs.com").validate().is_ok());
        assert!(sign_up(&"j".repeat(150), "john.carney@carneylabs.com").validate().is_ok());

        let errors = sign_up(&"j".repeat(151), "john.carney@carneylabs.com").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));

        let long_email = format!("{}@{}.com", "j".repeat(60), "carneylabs".repeat(20));
        let errors = sign_up("john", &long_email).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn empty_profile_patch_is_detected() {
        assert!(UpdateProfileModel::default().is_empty());

        let clear_photo = UpdateProfileModel { photo_url: Some(None), ..Default::default() };
        assert!(!clear_photo.is_empty());
    }
}
