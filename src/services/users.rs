use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use uuid::Uuid;

use crate::domain::auth::{AuthToken, AuthenticatedUser};
use crate::domain::image::{UploadKind, generate_image_path};
use crate::domain::types::{AuthTokenKey, ImagePath, UserId};
use crate::domain::user::{NewUser, UpdateUser, User, UserOrdering};
use crate::forms::uploads::ImageUpload;
use crate::forms::users::{ProfileFormPayload, RegisterFormPayload, TokenFormPayload};
use crate::repository::{UserListQuery, UserReader, UserWriter};
use crate::storage::ImageStorage;

use super::errors::repository_failure;
use super::{ServiceError, ServiceResult, discard_upload};

const INVALID_CREDENTIALS: &str = "Unable to authenticate with provided credentials";

fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            log::error!("Failed to hash password: {e}");
            ServiceError::Internal
        })
}

fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::error!("Stored password hash is malformed: {e}");
            false
        }
    }
}

/// Registers a new, non-staff user.
pub fn create_user<R>(payload: RegisterFormPayload, repo: &R) -> ServiceResult<User>
where
    R: UserWriter,
{
    let new_user = NewUser {
        email: payload.email,
        name: payload.name,
        password_hash: hash_password(&payload.password)?,
        is_staff: false,
        created_at: Utc::now().naive_utc(),
    };

    let created = repo
        .create_user(&new_user)
        .map_err(|e| repository_failure("create user", e))?;

    log::info!("Registered user {}", created.id);
    Ok(created)
}

/// Exchanges valid credentials for the user's API token.
///
/// Unknown emails, wrong passwords and inactive accounts all fail the same way.
pub fn issue_token<R>(payload: TokenFormPayload, repo: &R) -> ServiceResult<AuthToken>
where
    R: UserReader + UserWriter,
{
    let credentials = repo
        .get_credentials_by_email(&payload.email)
        .map_err(|e| repository_failure("get user credentials", e))?
        .filter(|c| c.user.is_active)
        .ok_or_else(|| ServiceError::Form(INVALID_CREDENTIALS.to_string()))?;

    if !verify_password(&payload.password, &credentials.password_hash) {
        return Err(ServiceError::Form(INVALID_CREDENTIALS.to_string()));
    }

    let candidate = AuthTokenKey::new(Uuid::new_v4().simple().to_string())?;
    repo.get_or_create_token(credentials.user.id, &candidate)
        .map_err(|e| repository_failure("issue token", e))
}

/// Resolves an API token key into the identity it belongs to.
pub fn authenticate_token<R>(key: &str, repo: &R) -> ServiceResult<AuthenticatedUser>
where
    R: UserReader,
{
    match repo.get_user_by_token(key) {
        Ok(Some(user)) => Ok(AuthenticatedUser::from(&user)),
        Ok(None) => Err(ServiceError::Unauthorized),
        Err(e) => Err(repository_failure("authenticate token", e)),
    }
}

pub fn list_users<R>(ordering: Option<&str>, repo: &R) -> ServiceResult<Vec<User>>
where
    R: UserReader,
{
    let ordering = ordering.map(UserOrdering::from_param).unwrap_or_default();

    repo.list_users(UserListQuery::default().ordering(ordering))
        .map_err(|e| repository_failure("list users", e))
}

pub fn get_user<R>(user_id: i32, repo: &R) -> ServiceResult<User>
where
    R: UserReader,
{
    let user_id = UserId::new(user_id).map_err(|_| ServiceError::NotFound)?;

    match repo.get_user_by_id(user_id) {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => Err(repository_failure("get user", e)),
    }
}

pub fn get_profile<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<User>
where
    R: UserReader,
{
    get_user(user.id.get(), repo)
}

/// Applies a full or partial profile update; a new password is re-hashed.
pub fn update_profile<R>(
    payload: ProfileFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<User>
where
    R: UserReader + UserWriter,
{
    let update = UpdateUser {
        email: payload.email,
        name: payload.name,
        password_hash: payload
            .password
            .as_deref()
            .map(hash_password)
            .transpose()?,
    };

    if update.is_empty() {
        return get_profile(user, repo);
    }

    repo.update_user(user.id, update)
        .map_err(|e| repository_failure("update profile", e))
}

pub fn delete_profile<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: UserWriter,
{
    match repo.delete_user(user.id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => {
            log::info!("User {} deleted their account", user.id);
            Ok(())
        }
        Err(e) => Err(repository_failure("delete profile", e)),
    }
}

/// Stores a new profile image for the authenticated user.
pub fn upload_profile_image<R, S>(
    upload: ImageUpload,
    user: &AuthenticatedUser,
    repo: &R,
    storage: &S,
) -> ServiceResult<User>
where
    R: UserWriter,
    S: ImageStorage,
{
    let image = ImagePath::new(generate_image_path(UploadKind::User, &upload.file_name))?;
    storage.save(image.as_str(), &upload.bytes).map_err(|e| {
        log::error!("Failed to store profile image for user {}: {e}", user.id);
        ServiceError::Internal
    })?;

    repo.set_user_image(user.id, &image).map_err(|e| {
        discard_upload(storage, image.as_str());
        repository_failure("set profile image", e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{UserEmail, UserName};
    use crate::repository::test::TestRepository;
    use crate::storage::test::MemoryStorage;
    use chrono::{DateTime, NaiveDateTime};

    fn at(seconds: i64) -> NaiveDateTime {
        DateTime::from_timestamp(seconds, 0).unwrap().naive_utc()
    }

    fn register(repo: &TestRepository, email: &str, password: &str) -> User {
        let payload = RegisterFormPayload {
            email: UserEmail::new(email).unwrap(),
            password: password.to_string(),
            name: UserName::new("Test User").unwrap(),
        };
        create_user(payload, repo).unwrap()
    }

    fn login(repo: &TestRepository, email: &str, password: &str) -> ServiceResult<AuthToken> {
        let payload = TokenFormPayload {
            email: UserEmail::new(email).unwrap(),
            password: password.to_string(),
        };
        issue_token(payload, repo)
    }

    #[test]
    fn stores_hashed_password() {
        let repo = TestRepository::default();
        register(&repo, "test@example.com", "testpass123");

        let credentials = repo
            .get_credentials_by_email(&UserEmail::new("test@example.com").unwrap())
            .unwrap()
            .unwrap();
        assert!(credentials.password_hash.starts_with("$argon2"));
        assert!(verify_password("testpass123", &credentials.password_hash));
        assert!(!verify_password("wrong", &credentials.password_hash));
    }

    #[test]
    fn duplicate_email_is_a_form_error() {
        let repo = TestRepository::default();
        register(&repo, "test@example.com", "testpass123");

        let payload = RegisterFormPayload {
            email: UserEmail::new("test@example.com").unwrap(),
            password: "otherpass".into(),
            name: UserName::new("Other").unwrap(),
        };
        assert!(matches!(
            create_user(payload, &repo).unwrap_err(),
            ServiceError::Form(_)
        ));
    }

    #[test]
    fn token_is_reused_for_the_same_user() {
        let repo = TestRepository::default();
        let user = register(&repo, "test@example.com", "testpass123");

        let first = login(&repo, "test@example.com", "testpass123").unwrap();
        let second = login(&repo, "test@example.com", "testpass123").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.user_id, user.id);

        let identity = authenticate_token(first.key.as_str(), &repo).unwrap();
        assert_eq!(identity.id, user.id);
        assert!(!identity.is_staff);
    }

    #[test]
    fn bad_credentials_are_rejected() {
        let repo = TestRepository::default();
        register(&repo, "test@example.com", "testpass123");

        assert!(matches!(
            login(&repo, "test@example.com", "wrongpass"),
            Err(ServiceError::Form(_))
        ));
        assert!(matches!(
            login(&repo, "nobody@example.com", "testpass123"),
            Err(ServiceError::Form(_))
        ));
        assert_eq!(
            authenticate_token("missing", &repo).unwrap_err(),
            ServiceError::Unauthorized
        );
    }

    #[test]
    fn lists_users_in_requested_order() {
        let repo = TestRepository::default();
        let first = register(&repo, "first@example.com", "password1");
        let second = register(&repo, "second@example.com", "password2");

        // Creation timestamps come from the clock; pin them for the assertion.
        let mut users = repo.list_users(UserListQuery::default()).unwrap();
        users[0].created_at = at(100);
        users[1].created_at = at(200);
        let repo = TestRepository::default().with_users(
            users
                .into_iter()
                .map(|user| crate::domain::user::UserCredentials {
                    user,
                    password_hash: String::new(),
                })
                .collect(),
        );

        let ids = |users: Vec<User>| users.into_iter().map(|u| u.id).collect::<Vec<_>>();
        assert_eq!(ids(list_users(None, &repo).unwrap()), [first.id, second.id]);
        assert_eq!(
            ids(list_users(Some("-created_at"), &repo).unwrap()),
            [second.id, first.id]
        );
        assert_eq!(
            ids(list_users(Some("unknown,created_at"), &repo).unwrap()),
            [first.id, second.id]
        );
    }

    #[test]
    fn partial_update_keeps_other_fields() {
        let repo = TestRepository::default();
        let user = register(&repo, "test@example.com", "testpass123");
        let identity = AuthenticatedUser::from(&user);

        let payload = ProfileFormPayload {
            name: Some(UserName::new("Renamed").unwrap()),
            ..Default::default()
        };
        let updated = update_profile(payload, &identity, &repo).unwrap();
        assert_eq!(updated.name.as_str(), "Renamed");
        assert_eq!(updated.email, user.email);

        let payload = ProfileFormPayload {
            password: Some("newpassword".into()),
            ..Default::default()
        };
        update_profile(payload, &identity, &repo).unwrap();
        assert!(login(&repo, "test@example.com", "newpassword").is_ok());
        assert!(login(&repo, "test@example.com", "testpass123").is_err());

        let unchanged = update_profile(ProfileFormPayload::default(), &identity, &repo).unwrap();
        assert_eq!(unchanged.name.as_str(), "Renamed");
    }

    #[test]
    fn deleting_profile_revokes_token() {
        let repo = TestRepository::default();
        let user = register(&repo, "test@example.com", "testpass123");
        let token = login(&repo, "test@example.com", "testpass123").unwrap();

        delete_profile(&AuthenticatedUser::from(&user), &repo).unwrap();

        assert_eq!(get_user(user.id.get(), &repo).unwrap_err(), ServiceError::NotFound);
        assert_eq!(
            authenticate_token(token.key.as_str(), &repo).unwrap_err(),
            ServiceError::Unauthorized
        );
    }

    #[test]
    fn profile_image_is_stored_under_user_uploads() {
        let repo = TestRepository::default();
        let user = register(&repo, "test@example.com", "testpass123");
        let storage = MemoryStorage::default();
        let upload =
            ImageUpload::new("me.jpg".into(), b"\xFF\xD8\xFF\xE0\0\x10JFIF".to_vec()).unwrap();

        let updated =
            upload_profile_image(upload, &AuthenticatedUser::from(&user), &repo, &storage)
                .unwrap();

        let image = updated.image.unwrap();
        assert!(image.as_str().starts_with("uploads/user/"));
        assert!(image.as_str().ends_with(".jpg"));
        assert_eq!(storage.saved.borrow()[0].0, image.as_str());
    }

    #[test]
    fn profile_image_of_deleted_user_is_not_kept() {
        let repo = TestRepository::default();
        let user = register(&repo, "test@example.com", "testpass123");
        let authenticated = AuthenticatedUser::from(&user);
        delete_profile(&authenticated, &repo).unwrap();

        let storage = MemoryStorage::default();
        let upload =
            ImageUpload::new("me.jpg".into(), b"\xFF\xD8\xFF\xE0\0\x10JFIF".to_vec()).unwrap();

        let err = upload_profile_image(upload, &authenticated, &repo, &storage).unwrap_err();
        assert_eq!(err, ServiceError::NotFound);
        assert!(storage.saved.borrow().is_empty());
    }
}
