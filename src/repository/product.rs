use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::product::{NewProduct, Product, UpdateProduct};
use crate::domain::property::{Property, ensure_distinct_property_names};
use crate::domain::types::{ImagePath, ProductId, PropertyId};
use crate::models::product::{NewProduct as DbNewProduct, Product as DbProduct, ProductChangeset};
use crate::models::property::{Property as DbProperty, ProductProperty};
use crate::repository::{
    DieselRepository, ProductListQuery, ProductReader, ProductWriter, RepositoryError,
    RepositoryResult,
};

/// Loads the properties attached to each of `product_ids`, keyed by product.
fn load_properties_for(
    conn: &mut SqliteConnection,
    product_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<Property>>> {
    use crate::schema::{product_properties, properties};

    let rows: Vec<(i32, DbProperty)> = product_properties::table
        .inner_join(properties::table)
        .filter(product_properties::product_id.eq_any(product_ids))
        .order((product_properties::product_id.asc(), properties::name_key.asc()))
        .select((product_properties::product_id, DbProperty::as_select()))
        .load(conn)?;

    let mut grouped: HashMap<i32, Vec<Property>> = HashMap::new();
    for (product_id, property) in rows {
        grouped
            .entry(product_id)
            .or_default()
            .push(property.try_into()?);
    }
    Ok(grouped)
}

/// Attaches properties to product rows, preserving row order.
fn hydrate(conn: &mut SqliteConnection, rows: Vec<DbProduct>) -> RepositoryResult<Vec<Product>> {
    let ids: Vec<i32> = rows.iter().map(|p| p.id).collect();
    let mut properties = load_properties_for(conn, &ids)?;

    rows.into_iter()
        .map(|row| {
            let props = properties.remove(&row.id).unwrap_or_default();
            row.into_domain(props).map_err(RepositoryError::from)
        })
        .collect()
}

fn load_product(conn: &mut SqliteConnection, id: ProductId) -> RepositoryResult<Option<Product>> {
    use crate::schema::products;

    let row = products::table
        .filter(products::id.eq(id.get()))
        .select(DbProduct::as_select())
        .first::<DbProduct>(conn)
        .optional()?;

    match row {
        Some(row) => Ok(hydrate(conn, vec![row])?.pop()),
        None => Ok(None),
    }
}

fn require_product(conn: &mut SqliteConnection, id: ProductId) -> RepositoryResult<Product> {
    load_product(conn, id)?.ok_or(RepositoryError::NotFound)
}

impl ProductReader for DieselRepository {
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let mut items = products::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(category_id) = query.category_id {
            items = items.filter(products::category_id.eq(category_id.get()));
        }

        let rows = items
            .order(products::id.asc())
            .select(DbProduct::as_select())
            .load::<DbProduct>(&mut conn)?;

        hydrate(&mut conn, rows)
    }

    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        let mut conn = self.conn()?;
        load_product(&mut conn, id)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_product: DbNewProduct = product.clone().into();

        let created = diesel::insert_into(products::table)
            .values(db_product)
            .returning(DbProduct::as_returning())
            .get_result::<DbProduct>(&mut conn)?;

        Ok(created.into_domain(vec![])?)
    }

    fn update_product(&self, id: ProductId, product: &UpdateProduct) -> RepositoryResult<Product> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let changes = ProductChangeset::new(product, Utc::now().naive_utc());

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let affected = diesel::update(products::table.filter(products::id.eq(id.get())))
                .set(changes)
                .execute(conn)?;
            if affected == 0 {
                return Err(RepositoryError::NotFound);
            }
            require_product(conn, id)
        })
    }

    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let affected =
            diesel::delete(products::table.filter(products::id.eq(id.get()))).execute(&mut conn)?;

        Ok(affected)
    }

    fn add_product_properties(
        &self,
        id: ProductId,
        property_ids: &[PropertyId],
    ) -> RepositoryResult<Product> {
        use crate::schema::{product_properties, properties};

        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let product = require_product(conn, id)?;

            let requested: BTreeSet<i32> = property_ids.iter().map(|p| p.get()).collect();
            let requested_ids: Vec<i32> = requested.iter().copied().collect();
            let additions = properties::table
                .filter(properties::id.eq_any(&requested_ids))
                .select(DbProperty::as_select())
                .load::<DbProperty>(conn)?
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<Vec<Property>, _>>()?;

            if additions.len() != requested.len() {
                let missing: Vec<String> = requested
                    .iter()
                    .filter(|id| !additions.iter().any(|p| p.id.get() == **id))
                    .map(ToString::to_string)
                    .collect();
                return Err(RepositoryError::ValidationError(format!(
                    "unknown property id(s): {}",
                    missing.join(", ")
                )));
            }

            ensure_distinct_property_names(product.properties.iter().chain(additions.iter()))?;

            if requested_ids.is_empty() {
                return Ok(product);
            }

            let links: Vec<ProductProperty> = requested_ids
                .iter()
                .map(|property_id| ProductProperty {
                    product_id: id.get(),
                    property_id: *property_id,
                })
                .collect();
            diesel::insert_or_ignore_into(product_properties::table)
                .values(&links)
                .execute(conn)?;

            require_product(conn, id)
        })
    }

    fn remove_product_property(
        &self,
        id: ProductId,
        property_id: PropertyId,
    ) -> RepositoryResult<usize> {
        use crate::schema::product_properties;

        let mut conn = self.conn()?;

        let affected = diesel::delete(
            product_properties::table
                .filter(product_properties::product_id.eq(id.get()))
                .filter(product_properties::property_id.eq(property_id.get())),
        )
        .execute(&mut conn)?;

        Ok(affected)
    }

    fn set_product_image(&self, id: ProductId, image: &ImagePath) -> RepositoryResult<Product> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let affected = diesel::update(products::table.filter(products::id.eq(id.get())))
                .set((
                    products::image.eq(Some(image.as_str())),
                    products::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)?;
            if affected == 0 {
                return Err(RepositoryError::NotFound);
            }
            require_product(conn, id)
        })
    }
}
