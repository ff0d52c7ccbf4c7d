//! PostgreSQL repository for the `movies` table.

use async_trait::async_trait;
use moviepin_core::types::DbId;
use sqlx::{FromRow, PgExecutor, PgPool};

use crate::models::movie::{Movie, MovieReview};
use crate::repositories::MovieRepository;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, release_date, genre, director, description";

/// Movie row joined with the raw average of its reviews.
#[derive(FromRow)]
struct MovieRatingRow {
    #[sqlx(flatten)]
    movie: Movie,
    average_rating: Option<f64>,
}

/// Movie storage backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct MovieRepo {
    pool: PgPool,
}

impl MovieRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert one movie through any executor (pool or open transaction).
    async fn insert<'e, E>(executor: E, movie: &Movie) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("INSERT INTO movies ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6)");
        sqlx::query(&query)
            .bind(movie.id)
            .bind(&movie.title)
            .bind(movie.release_date)
            .bind(&movie.genre)
            .bind(&movie.director)
            .bind(&movie.description)
            .execute(executor)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl MovieRepository for MovieRepo {
    async fn list_movies(&self) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies");
        sqlx::query_as::<_, Movie>(&query)
            .fetch_all(&self.pool)
            .await
    }

    async fn get_movie(&self, id: DbId) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1");
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn add_movie(&self, movie: &Movie) -> Result<(), sqlx::Error> {
        Self::insert(&self.pool, movie).await
    }

    async fn update_movie(&self, id: DbId, movie: &Movie) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE movies SET
                id = $1,
                title = $2,
                release_date = $3,
                genre = $4,
                director = $5,
                description = $6
             WHERE id = $7",
        )
        .bind(movie.id)
        .bind(&movie.title)
        .bind(movie.release_date)
        .bind(&movie.genre)
        .bind(&movie.director)
        .bind(&movie.description)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_movie(&self, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every row, then insert `movies`, inside one transaction.
    ///
    /// The transaction is owned by this call and inserts run on it in
    /// order. The first failed insert rolls the transaction back and is
    /// returned; commit happens only once every insert has succeeded.
    async fn replace_movies(&self, movies: &[Movie]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM movies")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        for movie in movies {
            if let Err(err) = Self::insert(&mut *tx, movie).await {
                tracing::warn!(
                    movie_id = %movie.id,
                    error = %err,
                    "Insert failed during collection replace, rolling back",
                );
                tx.rollback().await?;
                return Err(err);
            }
        }

        tx.commit().await?;

        tracing::debug!(removed, inserted = movies.len(), "Movie collection replaced");
        Ok(())
    }

    async fn get_movie_rating(&self, id: DbId) -> Result<Option<MovieReview>, sqlx::Error> {
        let row = sqlx::query_as::<_, MovieRatingRow>(
            "SELECT m.id, m.title, m.release_date, m.genre, m.director, m.description,
                    AVG(r.rating)::float8 AS average_rating
             FROM movies m
             LEFT JOIN reviews r ON r.movie_id = m.id
             WHERE m.id = $1
             GROUP BY m.id",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| MovieReview::from_average(row.movie, row.average_rating)))
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }
}
