use crate::domain::auth::AuthenticatedUser;
use crate::domain::property::Property;
use crate::domain::types::PropertyId;
use crate::forms::properties::PropertyFormPayload;
use crate::repository::{PropertyReader, PropertyWriter};

use super::errors::repository_failure;
use super::{ServiceError, ServiceResult, ensure_staff};

pub fn list_properties<R>(repo: &R) -> ServiceResult<Vec<Property>>
where
    R: PropertyReader,
{
    repo.list_properties()
        .map_err(|e| repository_failure("list properties", e))
}

pub fn get_property<R>(property_id: i32, repo: &R) -> ServiceResult<Property>
where
    R: PropertyReader,
{
    let property_id = PropertyId::new(property_id).map_err(|_| ServiceError::NotFound)?;

    match repo.get_property_by_id(property_id) {
        Ok(Some(property)) => Ok(property),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => Err(repository_failure("get property", e)),
    }
}

/// Creates a property. The name and value pair is unique ignoring case, so
/// `FABRIC/COTTON` is rejected once `Fabric/Cotton` exists but `FABRIC/Linen`
/// is not.
pub fn create_property<R>(
    payload: PropertyFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Property>
where
    R: PropertyWriter,
{
    ensure_staff(user)?;

    repo.create_property(&payload.into_new_property())
        .map_err(|e| repository_failure("create property", e))
}

pub fn update_property<R>(
    property_id: i32,
    payload: PropertyFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Property>
where
    R: PropertyWriter,
{
    ensure_staff(user)?;

    let property_id = PropertyId::new(property_id).map_err(|_| ServiceError::NotFound)?;

    repo.update_property(property_id, &payload.into_new_property())
        .map_err(|e| repository_failure("update property", e))
}

pub fn delete_property<R>(property_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: PropertyWriter,
{
    ensure_staff(user)?;

    let property_id = PropertyId::new(property_id).map_err(|_| ServiceError::NotFound)?;

    match repo.delete_property(property_id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(e) => Err(repository_failure("delete property", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{PropertyName, PropertyValue, UserId};
    use crate::repository::test::TestRepository;

    fn staff() -> AuthenticatedUser {
        AuthenticatedUser {
            id: UserId::new(1).unwrap(),
            email: "admin@example.com".into(),
            is_staff: true,
        }
    }

    fn payload(name: &str, value: &str) -> PropertyFormPayload {
        PropertyFormPayload {
            name: PropertyName::new(name).unwrap(),
            value: PropertyValue::new(value).unwrap(),
        }
    }

    #[test]
    fn created_property_displays_name_and_value() {
        let repo = TestRepository::default();

        let property = create_property(payload("color", "red"), &staff(), &repo).unwrap();
        assert_eq!(property.to_string(), "color red");
    }

    #[test]
    fn rejects_case_insensitive_duplicates() {
        let repo = TestRepository::default();

        create_property(payload("Fabric", "Cotton"), &staff(), &repo).unwrap();
        let err = create_property(payload("FABRIC", "COTTON"), &staff(), &repo).unwrap_err();

        assert!(matches!(err, ServiceError::Form(_)));
        assert_eq!(list_properties(&repo).unwrap().len(), 1);

        create_property(payload("FABRIC", "Linen"), &staff(), &repo).unwrap();
        assert_eq!(list_properties(&repo).unwrap().len(), 2);
    }

    #[test]
    fn update_into_existing_property_is_rejected() {
        let repo = TestRepository::default();

        create_property(payload("color", "red"), &staff(), &repo).unwrap();
        let size = create_property(payload("size", "XL"), &staff(), &repo).unwrap();

        let err =
            update_property(size.id.get(), payload("Color", "RED"), &staff(), &repo).unwrap_err();
        assert!(matches!(err, ServiceError::Form(_)));

        let other_value =
            update_property(size.id.get(), payload("Color", "XL"), &staff(), &repo).unwrap();
        assert_eq!(other_value.to_string(), "Color XL");

        let recased =
            update_property(size.id.get(), payload("SIZE", "L"), &staff(), &repo).unwrap();
        assert_eq!(recased.to_string(), "SIZE L");
    }

    #[test]
    fn deleting_missing_property_is_not_found() {
        let repo = TestRepository::default();
        assert_eq!(
            delete_property(3, &staff(), &repo).unwrap_err(),
            ServiceError::NotFound
        );
    }
}
