use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::Result,
    models::{Product, ProductFields, ProductQuery},
};

/// Sentinel category meaning "no category filter".
const CATEGORY_ALL: &str = "all";

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

pub async fn search_products(pool: &PgPool, params: &ProductQuery) -> Result<Vec<Product>> {
    let mut query = build_search_query(params);

    let products = query.build_query_as::<Product>().fetch_all(pool).await?;

    Ok(products)
}

fn build_search_query(params: &ProductQuery) -> QueryBuilder<'static, Postgres> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM products WHERE 1=1");

    if let Some(ref category) = params.category {
        if category != CATEGORY_ALL {
            query.push(" AND category = ");
            query.push_bind(category.clone());
        }
    }

    if let Some(min_price) = params.min_price {
        query.push(" AND price >= ");
        query.push_bind(min_price);
    }

    if let Some(max_price) = params.max_price {
        query.push(" AND price <= ");
        query.push_bind(max_price);
    }

    if let Some(ref search) = params.search {
        query.push(" AND (name ILIKE ");
        query.push_bind(format!("%{}%", search));
        query.push(" OR description ILIKE ");
        query.push_bind(format!("%{}%", search));
        query.push(")");
    }

    query.push(" ORDER BY created_at DESC");

    query
}

pub async fn create_product(
    pool: &PgPool,
    name: &str,
    price: Decimal,
    description: Option<&str>,
    category: Option<&str>,
    image: Option<&str>,
) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products (name, price, description, category, image)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(name)
    .bind(price)
    .bind(description)
    .bind(category)
    .bind(image)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

pub async fn update_product(
    pool: &PgPool,
    id: i32,
    fields: &ProductFields,
    image: Option<&str>,
) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        "UPDATE products
         SET
             name = COALESCE($1, name),
             price = COALESCE($2, price),
             description = COALESCE($3, description),
             category = COALESCE($4, category),
             image = COALESCE($5, image),
             updated_at = NOW()
         WHERE id = $6
         RETURNING *",
    )
    .bind(&fields.name)
    .bind(fields.price)
    .bind(&fields.description)
    .bind(&fields.category)
    .bind(image)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

pub async fn delete_product(pool: &PgPool, id: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("DELETE FROM products WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_without_filters() {
        let sql = build_search_query(&ProductQuery::default()).into_sql();

        assert_eq!(sql, "SELECT * FROM products WHERE 1=1 ORDER BY created_at DESC");
    }

    #[test]
    fn test_search_query_category_all_is_a_sentinel() {
        let params = ProductQuery {
            category: Some("all".to_string()),
            ..ProductQuery::default()
        };

        let sql = build_search_query(&params).into_sql();
        assert!(!sql.contains("category ="));
    }

    #[test]
    fn test_search_query_category_filter() {
        let params = ProductQuery {
            category: Some("furniture".to_string()),
            ..ProductQuery::default()
        };

        let sql = build_search_query(&params).into_sql();
        assert!(sql.contains("AND category = $1"));
    }

    #[test]
    fn test_search_query_composes_all_filters() {
        let params = ProductQuery {
            category: Some("furniture".to_string()),
            min_price: Some(Decimal::new(100, 0)),
            max_price: Some(Decimal::new(500, 0)),
            search: Some("oak".to_string()),
        };

        let sql = build_search_query(&params).into_sql();
        assert!(sql.contains("AND category = $1"));
        assert!(sql.contains("AND price >= $2"));
        assert!(sql.contains("AND price <= $3"));
        assert!(sql.contains("AND (name ILIKE $4 OR description ILIKE $5)"));
        assert!(sql.ends_with("ORDER BY created_at DESC"));
    }

    #[test]
    fn test_search_query_price_bounds_are_independent() {
        let params = ProductQuery {
            max_price: Some(Decimal::new(500, 0)),
            ..ProductQuery::default()
        };

        let sql = build_search_query(&params).into_sql();
        assert!(!sql.contains("price >="));
        assert!(sql.contains("AND price <= $1"));
    }
}
