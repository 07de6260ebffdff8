use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::property::{NewProperty, Property, ensure_unique_property};
use crate::domain::types::PropertyId;
use crate::models::property::{NewProperty as DbNewProperty, Property as DbProperty};
use crate::repository::{
    DieselRepository, PropertyReader, PropertyWriter, RepositoryError, RepositoryResult,
};

/// Rejects `property` if another row has the same name and value, ignoring case.
///
/// The UNIQUE index on `(name_key, value_key)` backs this up; checking first
/// gives callers a readable message instead of a constraint error.
fn check_property_is_free(
    conn: &mut SqliteConnection,
    property: &NewProperty,
    own_id: Option<PropertyId>,
) -> RepositoryResult<()> {
    use crate::schema::properties;

    let clashes = properties::table
        .filter(properties::name_key.eq(property.name.normalized()))
        .filter(properties::value_key.eq(property.value.normalized()))
        .select(DbProperty::as_select())
        .load::<DbProperty>(conn)?
        .into_iter()
        .map(TryInto::try_into)
        .collect::<Result<Vec<Property>, _>>()?;

    ensure_unique_property(property, own_id, &clashes)?;
    Ok(())
}

impl PropertyReader for DieselRepository {
    fn list_properties(&self) -> RepositoryResult<Vec<Property>> {
        use crate::schema::properties;

        let mut conn = self.conn()?;

        let items = properties::table
            .order((
                properties::name_key.asc(),
                properties::value_key.asc(),
                properties::id.asc(),
            ))
            .select(DbProperty::as_select())
            .load::<DbProperty>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Property>, _>>()?;

        Ok(items)
    }

    fn get_property_by_id(&self, id: PropertyId) -> RepositoryResult<Option<Property>> {
        use crate::schema::properties;

        let mut conn = self.conn()?;

        let property = properties::table
            .filter(properties::id.eq(id.get()))
            .select(DbProperty::as_select())
            .first::<DbProperty>(&mut conn)
            .optional()?;

        Ok(property.map(TryInto::try_into).transpose()?)
    }
}

impl PropertyWriter for DieselRepository {
    fn create_property(&self, property: &NewProperty) -> RepositoryResult<Property> {
        use crate::schema::properties;

        let mut conn = self.conn()?;

        let created = conn.transaction::<_, RepositoryError, _>(|conn| {
            check_property_is_free(conn, property, None)?;

            Ok(diesel::insert_into(properties::table)
                .values(DbNewProperty::from(property))
                .returning(DbProperty::as_returning())
                .get_result::<DbProperty>(conn)?)
        })?;

        Ok(created.try_into()?)
    }

    fn update_property(
        &self,
        id: PropertyId,
        property: &NewProperty,
    ) -> RepositoryResult<Property> {
        use crate::schema::properties;

        let mut conn = self.conn()?;

        let updated = conn.transaction::<_, RepositoryError, _>(|conn| {
            check_property_is_free(conn, property, Some(id))?;

            diesel::update(properties::table.filter(properties::id.eq(id.get())))
                .set(DbNewProperty::from(property))
                .returning(DbProperty::as_returning())
                .get_result::<DbProperty>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)
        })?;

        Ok(updated.try_into()?)
    }

    fn delete_property(&self, id: PropertyId) -> RepositoryResult<usize> {
        use crate::schema::properties;

        let mut conn = self.conn()?;

        let affected = diesel::delete(properties::table.filter(properties::id.eq(id.get())))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
