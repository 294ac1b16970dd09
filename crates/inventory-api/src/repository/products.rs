//! Product Repository
//!
//! 상품 CRUD와 재고 차감을 담당합니다. 모든 변경 작업은 요청당 하나의 트랜잭션에서 수행되며,
//! 실패 경로에서는 커밋 없이 드롭되어 롤백됩니다.

use inventory_core::{PatchValue, Product, ProductDraft, ProductPatch};
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use tracing::{debug, info};

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id          SERIAL PRIMARY KEY,
    name        VARCHAR(255)   NOT NULL,
    price       NUMERIC(10, 2) NOT NULL CHECK (price >= 0),
    stock       INTEGER        NOT NULL DEFAULT 0 CHECK (stock >= 0),
    description TEXT           NOT NULL DEFAULT '',
    category    VARCHAR(100)   NOT NULL DEFAULT '',
    image_url   VARCHAR(500)   NOT NULL DEFAULT '',
    created_at  TIMESTAMPTZ    NOT NULL DEFAULT NOW(),
    updated_at  TIMESTAMPTZ    NOT NULL DEFAULT NOW()
)
"#;

const CREATE_INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS idx_products_created_at ON products (created_at DESC)";

/// 재고 차감 결과.
#[derive(Debug, Clone, PartialEq)]
pub enum StockDecrease {
    /// 차감 완료 (갱신된 상품)
    Decreased(Product),
    /// 상품 없음
    NotFound,
    /// 재고 부족 (현재 재고)
    Insufficient { available: i32 },
}

impl StockDecrease {
    /// 메트릭 라벨용 결과 이름.
    pub fn outcome(&self) -> &'static str {
        match self {
            StockDecrease::Decreased(_) => "decreased",
            StockDecrease::NotFound => "not_found",
            StockDecrease::Insufficient { .. } => "insufficient",
        }
    }
}

/// 상품 저장소.
pub struct ProductRepository;

impl ProductRepository {
    // ============================================================================================
    // Bootstrap
    // ============================================================================================

    /// 테이블과 인덱스 생성 (멱등).
    pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query(CREATE_TABLE_SQL).execute(&mut *tx).await?;
        sqlx::query(CREATE_INDEX_SQL).execute(&mut *tx).await?;
        tx.commit().await?;

        debug!("products 스키마 확인 완료");
        Ok(())
    }

    /// 테이블이 비어 있을 때만 샘플 상품 삽입.
    ///
    /// # Returns
    ///
    /// 삽입된 행 수 (이미 데이터가 있으면 0)
    pub async fn seed_if_empty(pool: &PgPool, drafts: &[ProductDraft]) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            return Ok(0);
        }

        let mut inserted = 0;
        for draft in drafts {
            inserted += sqlx::query(
                r#"
                INSERT INTO products (name, price, stock, description, category, image_url)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&draft.name)
            .bind(draft.price)
            .bind(draft.stock)
            .bind(&draft.description)
            .bind(&draft.category)
            .bind(&draft.image_url)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        tx.commit().await?;
        info!(count = inserted, "샘플 상품 삽입 완료");
        Ok(inserted)
    }

    // ============================================================================================
    // Queries
    // ============================================================================================

    /// 전체 상품 조회 (최신 생성 순).
    pub async fn list(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY created_at DESC, id DESC")
            .fetch_all(pool)
            .await
    }

    /// 단일 상품 조회.
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // ============================================================================================
    // Mutations
    // ============================================================================================

    /// 상품 생성. 두 타임스탬프는 DB 기본값으로 기록됩니다.
    pub async fn create(pool: &PgPool, draft: &ProductDraft) -> Result<Product, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price, stock, description, category, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&draft.name)
        .bind(draft.price)
        .bind(draft.stock)
        .bind(&draft.description)
        .bind(&draft.category)
        .bind(&draft.image_url)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(product)
    }

    /// 부분 수정. 패치에 포함된 허용 컬럼만 갱신하고 `updated_at`을 새로 기록합니다.
    ///
    /// 빈 패치는 호출 전에 걸러져야 하며, 이 경우에도 `updated_at`만 갱신됩니다.
    ///
    /// # Returns
    ///
    /// 갱신된 상품, 없으면 None
    pub async fn update(
        pool: &PgPool,
        id: i32,
        patch: &ProductPatch,
    ) -> Result<Option<Product>, sqlx::Error> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE products SET ");
        {
            let mut set = qb.separated(", ");
            for (column, value) in patch.changes() {
                set.push(column.as_str());
                set.push_unseparated(" = ");
                match value {
                    PatchValue::Text(text) => set.push_bind_unseparated(text.to_owned()),
                    PatchValue::Decimal(decimal) => set.push_bind_unseparated(decimal),
                    PatchValue::Integer(integer) => set.push_bind_unseparated(integer),
                };
            }
            set.push("updated_at = NOW()");
        }
        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        let mut tx = pool.begin().await?;
        let product = qb
            .build_query_as::<Product>()
            .fetch_optional(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(product)
    }

    /// 상품 삭제.
    ///
    /// # Returns
    ///
    /// 삭제되었으면 true, 대상이 없으면 false
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let deleted = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;
        tx.commit().await?;

        Ok(deleted)
    }

    /// 조건부 재고 차감.
    ///
    /// `stock >= quantity` 조건을 UPDATE 문 안에서 검사하므로 동시 요청이 같은 행에서
    /// 직렬화되며 재고가 음수가 되지 않습니다. 갱신된 행이 없으면 같은 트랜잭션에서
    /// 행을 잠근 채 다시 읽어 없음과 재고 부족을 구분합니다. 잠금 이후 읽은 재고가
    /// 충분하면(그 사이 다른 요청이 재고를 늘린 경우) 차감을 한 번 더 시도하므로
    /// `Insufficient`의 `available`은 항상 요청 수량보다 작습니다.
    pub async fn decrease_stock(
        pool: &PgPool,
        id: i32,
        quantity: i32,
    ) -> Result<StockDecrease, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if let Some(product) = Self::conditional_decrement(&mut tx, id, quantity).await? {
            tx.commit().await?;
            return Ok(StockDecrease::Decreased(product));
        }

        let available: Option<i32> =
            sqlx::query_scalar("SELECT stock FROM products WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let outcome = match available {
            None => StockDecrease::NotFound,
            Some(available) if available < quantity => StockDecrease::Insufficient { available },
            Some(_) => match Self::conditional_decrement(&mut tx, id, quantity).await? {
                Some(product) => {
                    tx.commit().await?;
                    return Ok(StockDecrease::Decreased(product));
                }
                // 행을 잠근 상태이므로 도달하지 않음
                None => StockDecrease::NotFound,
            },
        };
        tx.rollback().await?;

        Ok(outcome)
    }

    async fn conditional_decrement(
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
        quantity: i32,
    ) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET stock = stock - $2, updated_at = NOW()
            WHERE id = $1 AND stock >= $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(quantity)
        .fetch_optional(&mut **tx)
        .await
    }
}
