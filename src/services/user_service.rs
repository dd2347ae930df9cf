//! Account management: registration, profile updates, password changes.

use mongodb::bson::{DateTime, Document, doc, oid::ObjectId};

use crate::error::{AppError, AppResult};
use crate::models::{Role, User};
use crate::repositories::base::case_insensitive;
use crate::repositories::{FindAllOptions, Listing, PageOptions, Repository};
use crate::services::QueryOptions;
use crate::utils::password::{hash_password, verify_password};

#[derive(Debug, Clone)]
pub struct CreateUserData {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
    pub phone_number: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProfileData {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub profile_image: Option<String>,
}

/// Inputs for a password change. `password` and `confirm_password` are equal
/// once request validation has passed.
#[derive(Debug, Clone)]
pub struct ChangePasswordData {
    pub current_password: String,
    pub password: String,
    pub confirm_password: String,
}

/// User service for account-level business rules.
#[derive(Clone)]
pub struct UserService {
    repo: Repository<User>,
}

impl UserService {
    pub fn new(repo: Repository<User>) -> Self {
        Self { repo }
    }

    /// Projection that keeps the password hash out of outward-facing reads.
    fn public_fields() -> Document {
        doc! { "password": 0 }
    }

    /// Lists users with optional role/active filters; a search term matches
    /// name and email instead.
    pub async fn get_all(
        &self,
        page: PageOptions,
        query: QueryOptions,
    ) -> AppResult<Listing<User>> {
        let mut filter = Document::new();
        if let Some(role) = query.role {
            filter.insert("role", role.as_str());
        }
        if let Some(is_active) = query.is_active {
            filter.insert("isActive", is_active);
        }

        if let Some(search) = &query.search {
            filter = doc! {
                "$or": [
                    { "fullName": case_insensitive(search) },
                    { "email": case_insensitive(search) },
                ]
            };
        }

        self.repo
            .find_all(FindAllOptions {
                filter,
                fields: Some(Self::public_fields()),
                page,
                sort_by: query.sort_by,
                sort_order: query.sort_order,
                optimized: false,
            })
            .await
    }

    pub async fn get_by_id(&self, id: ObjectId) -> AppResult<User> {
        self.repo
            .find_one_or_error(
                FindAllOptions {
                    filter: doc! { "_id": id },
                    fields: Some(Self::public_fields()),
                    ..Default::default()
                },
                None,
            )
            .await
    }

    /// Registers a new account; a duplicate email is a `Conflict`. The
    /// password is hashed before the document is written.
    pub async fn create(&self, data: CreateUserData) -> AppResult<User> {
        let existing = self
            .repo
            .find_one(
                FindAllOptions {
                    filter: doc! { "email": &data.email },
                    optimized: true,
                    ..Default::default()
                },
                None,
            )
            .await?;
        if existing.is_some() {
            return Err(AppError::conflict("User already exists."));
        }

        let user = User::new(
            data.full_name,
            data.email,
            hash_password(&data.password)?,
            data.role.unwrap_or(Role::Customer),
            data.phone_number,
            data.profile_image,
        );
        self.repo.insert(&user).await?;

        Ok(user.sanitized())
    }

    /// Changes the password after checking the current one. Reusing the
    /// current password is a `Conflict`, even when the current-password
    /// check passed.
    pub async fn change_password(
        &self,
        user_id: ObjectId,
        data: ChangePasswordData,
    ) -> AppResult<()> {
        let user = self
            .repo
            .find_one_or_error(FindAllOptions::with_filter(doc! { "_id": user_id }), None)
            .await?;

        let stored_hash = user.password.as_deref().unwrap_or_default();

        if !verify_password(&data.current_password, stored_hash).unwrap_or(false) {
            return Err(AppError::conflict("Current password is incorrect."));
        }

        if verify_password(&data.confirm_password, stored_hash).unwrap_or(false) {
            return Err(AppError::conflict(
                "Current password cannot be used as new password.",
            ));
        }

        let password_hash = hash_password(&data.password)?;
        self.repo
            .update_one(
                doc! { "_id": user_id },
                doc! { "$set": { "password": password_hash, "updatedAt": DateTime::now() } },
            )
            .await
    }

    /// Applies only the supplied profile fields, leaving others unchanged.
    pub async fn update_profile(
        &self,
        user_id: ObjectId,
        data: UpdateProfileData,
    ) -> AppResult<User> {
        // Fetched with the password included so the replace keeps the hash.
        let mut user = self
            .repo
            .find_one_or_error(FindAllOptions::with_filter(doc! { "_id": user_id }), None)
            .await?;

        if let Some(full_name) = data.full_name {
            user.full_name = full_name;
        }
        if let Some(phone_number) = data.phone_number {
            user.phone_number = Some(phone_number);
        }
        if let Some(profile_image) = data.profile_image {
            user.profile_image = Some(profile_image);
        }
        user.updated_at = DateTime::now();

        self.repo
            .replace(doc! { "_id": user_id }, &user, None)
            .await?;

        Ok(user.sanitized())
    }

    /// Flips the active flag and persists it.
    pub async fn toggle_active(&self, user_id: ObjectId) -> AppResult<User> {
        let mut user = self
            .repo
            .find_one_or_error(FindAllOptions::with_filter(doc! { "_id": user_id }), None)
            .await?;

        user.is_active = !user.is_active;
        user.updated_at = DateTime::now();

        self.repo
            .replace(doc! { "_id": user_id }, &user, None)
            .await?;

        Ok(user.sanitized())
    }

    /// Removes the account entirely.
    pub async fn delete_account(&self, user_id: ObjectId) -> AppResult<()> {
        self.repo.delete_one(doc! { "_id": user_id }, None).await?;
        Ok(())
    }
}
