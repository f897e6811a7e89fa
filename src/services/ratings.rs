use sqlx::PgPool;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::Rating;
use crate::repositories;
use crate::services::errors::DomainError;

pub(crate) const MIN_RATING: i32 = 1;
pub(crate) const MAX_RATING: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RatingAggregate {
    pub(crate) average: f64,
    pub(crate) count: i64,
}

pub(crate) struct NewRating<'a> {
    pub(crate) user_id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) rating: i32,
    pub(crate) comment: Option<&'a str>,
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) async fn add_rating(pool: &PgPool, rating: NewRating<'_>) -> Result<Rating, DomainError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating.rating) {
        return Err(DomainError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }

    let mut tx = pool.begin().await?;
    if repositories::courses::find_by_id(&mut *tx, rating.course_id).await?.is_none() {
        return Err(DomainError::NotFound("Course"));
    }
    if repositories::ratings::exists(&mut *tx, rating.user_id, rating.course_id).await? {
        return Err(DomainError::AlreadyRated);
    }

    let id = Uuid::new_v4().to_string();
    let stored = repositories::ratings::create(
        &mut *tx,
        repositories::ratings::CreateRating {
            id: &id,
            user_id: rating.user_id,
            course_id: rating.course_id,
            rating: rating.rating,
            comment: rating.comment.map(str::trim).filter(|value| !value.is_empty()),
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| DomainError::unique_or(e, DomainError::AlreadyRated))?;
    tx.commit().await?;

    metrics::counter!("ratings_total").increment(1);
    tracing::info!(
        user_id = rating.user_id,
        course_id = rating.course_id,
        rating = stored.rating,
        action = "rate_course",
        "Rating stored"
    );
    Ok(stored)
}

pub(crate) async fn get_aggregate(
    pool: &PgPool,
    course_id: &str,
) -> Result<RatingAggregate, DomainError> {
    let (average, count) = repositories::ratings::aggregate(pool, course_id).await?;
    Ok(RatingAggregate { average: round_one_decimal(average), count })
}

pub(crate) async fn has_rated(
    pool: &PgPool,
    user_id: &str,
    course_id: &str,
) -> Result<bool, DomainError> {
    Ok(repositories::ratings::exists(pool, user_id, course_id).await?)
}

#[cfg(test)]
mod tests {
    use super::{add_rating, get_aggregate, has_rated, round_one_decimal, NewRating};
    use crate::db::types::UserRole;
    use crate::services::errors::DomainError;
    use crate::test_support;

    #[test]
    fn rounding_keeps_one_decimal() {
        assert_eq!(round_one_decimal(4.0), 4.0);
        assert_eq!(round_one_decimal(11.0 / 3.0), 3.7);
        assert_eq!(round_one_decimal(4.25), 4.3);
        assert_eq!(round_one_decimal(0.0), 0.0);
    }

    #[tokio::test]
    async fn aggregate_averages_all_ratings() {
        let ctx = test_support::setup_test_context().await;
        let course = test_support::insert_course(ctx.state.db(), "rated@example.com", 1).await;

        let empty = get_aggregate(ctx.state.db(), &course.id).await.expect("empty aggregate");
        assert_eq!((empty.average, empty.count), (0.0, 0));

        for (index, value) in [5, 3, 4].into_iter().enumerate() {
            let rater = test_support::insert_user(
                ctx.state.db(),
                &format!("rater{index}@example.com"),
                UserRole::Student,
                "rater-pass",
            )
            .await;
            add_rating(
                ctx.state.db(),
                NewRating { user_id: &rater.id, course_id: &course.id, rating: value, comment: None },
            )
            .await
            .expect("add rating");
        }

        let aggregate = get_aggregate(ctx.state.db(), &course.id).await.expect("aggregate");
        assert_eq!((aggregate.average, aggregate.count), (4.0, 3));
    }

    #[tokio::test]
    async fn second_rating_is_rejected_and_first_is_kept() {
        let ctx = test_support::setup_test_context().await;
        let course = test_support::insert_course(ctx.state.db(), "once@example.com", 1).await;
        let rater = test_support::insert_user(
            ctx.state.db(),
            "once-rater@example.com",
            UserRole::Student,
            "rater-pass",
        )
        .await;

        assert!(!has_rated(ctx.state.db(), &rater.id, &course.id).await.expect("has rated"));
        add_rating(
            ctx.state.db(),
            NewRating {
                user_id: &rater.id,
                course_id: &course.id,
                rating: 2,
                comment: Some("  Too fast  "),
            },
        )
        .await
        .expect("first rating");
        assert!(has_rated(ctx.state.db(), &rater.id, &course.id).await.expect("has rated"));

        let second = add_rating(
            ctx.state.db(),
            NewRating { user_id: &rater.id, course_id: &course.id, rating: 5, comment: None },
        )
        .await;
        assert!(matches!(second, Err(DomainError::AlreadyRated)));

        let (stored, comment): (i32, Option<String>) = sqlx::query_as(
            "SELECT rating, comment FROM ratings WHERE user_id = $1 AND course_id = $2",
        )
        .bind(&rater.id)
        .bind(&course.id)
        .fetch_one(ctx.state.db())
        .await
        .expect("stored rating");
        assert_eq!(stored, 2);
        assert_eq!(comment.as_deref(), Some("Too fast"));
    }

    #[tokio::test]
    async fn concurrent_ratings_keep_a_single_row() {
        let ctx = test_support::setup_test_context().await;
        let course = test_support::insert_course(ctx.state.db(), "race@example.com", 1).await;
        let rater = test_support::insert_user(
            ctx.state.db(),
            "race-rater@example.com",
            UserRole::Student,
            "rater-pass",
        )
        .await;

        let (first, second) = tokio::join!(
            add_rating(
                ctx.state.db(),
                NewRating { user_id: &rater.id, course_id: &course.id, rating: 4, comment: None },
            ),
            add_rating(
                ctx.state.db(),
                NewRating { user_id: &rater.id, course_id: &course.id, rating: 1, comment: None },
            )
        );
        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
        assert_eq!(
            outcomes
                .iter()
                .filter(|outcome| matches!(outcome, Err(DomainError::AlreadyRated)))
                .count(),
            1
        );

        let aggregate = get_aggregate(ctx.state.db(), &course.id).await.expect("aggregate");
        assert_eq!(aggregate.count, 1);
    }

    #[tokio::test]
    async fn out_of_range_rating_is_a_validation_error() {
        let ctx = test_support::setup_test_context().await;
        let course = test_support::insert_course(ctx.state.db(), "range@example.com", 1).await;
        let rater = test_support::insert_user(
            ctx.state.db(),
            "range-rater@example.com",
            UserRole::Student,
            "rater-pass",
        )
        .await;

        let err = add_rating(
            ctx.state.db(),
            NewRating { user_id: &rater.id, course_id: &course.id, rating: 6, comment: None },
        )
        .await
        .expect_err("out of range");
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
