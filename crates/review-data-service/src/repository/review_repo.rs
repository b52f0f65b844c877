//! 综述仓储
//!
//! 负责综述聚合的存储编排：列表摘要、聚合读取、创建与整体替换。
//! 写路径的不变量：
//! - 综述行与全部子集合在同一事务内落库，任一语句失败则整体回滚
//! - 更新时四个子集合整体删除后重插，不做增量合并或 id 对账
//! - 子记录的 review_id 写入前统一改写为父 id，客户端提交值不可信

use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, instrument};

use crate::aggregate::{self, ReviewAggregate};
use crate::error::{Result, ServiceError};
use crate::models::{EffectSize, Exposure, Moderator, Outcome, ReviewRecord, ReviewSummary};

/// 保存结果：用于区分创建和覆盖，仅影响日志与响应语义
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
}

/// 综述行的插入语句（POST 创建路径，重复 id 由主键冲突直接报错）
const INSERT_REVIEW_SQL: &str = r#"
    INSERT INTO reviews (
        id, extractor_name, extraction_date, first_author, year_of_publication,
        search_strategy_desc, sample_age_desc, sample_age_lowest_mean,
        sample_age_highest_mean, are_you_sure, inclusion_exclusion_concerns,
        earliest_publication_year, latest_publication_year, number_of_studies,
        number_of_samples, rating_of_low_risk_bias, rating_of_moderate_risk_bias,
        rating_of_high_risk_bias, bias_rating_system, bias_rating_system_reference,
        level_of_evidence_judgement_1, level_of_evidence_judgement_2,
        level_of_evidence_judgement_3, notes
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
            $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24)
"#;

/// 综述行的原子 upsert（PUT 保存路径）。
/// 用冲突触发更新代替「先查存在再分支」，消除并发同 id 写入时的检查后写竞态。
const UPSERT_REVIEW_SQL: &str = r#"
    INSERT INTO reviews (
        id, extractor_name, extraction_date, first_author, year_of_publication,
        search_strategy_desc, sample_age_desc, sample_age_lowest_mean,
        sample_age_highest_mean, are_you_sure, inclusion_exclusion_concerns,
        earliest_publication_year, latest_publication_year, number_of_studies,
        number_of_samples, rating_of_low_risk_bias, rating_of_moderate_risk_bias,
        rating_of_high_risk_bias, bias_rating_system, bias_rating_system_reference,
        level_of_evidence_judgement_1, level_of_evidence_judgement_2,
        level_of_evidence_judgement_3, notes
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
            $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24)
    ON CONFLICT (id) DO UPDATE SET
        extractor_name = EXCLUDED.extractor_name,
        extraction_date = EXCLUDED.extraction_date,
        first_author = EXCLUDED.first_author,
        year_of_publication = EXCLUDED.year_of_publication,
        search_strategy_desc = EXCLUDED.search_strategy_desc,
        sample_age_desc = EXCLUDED.sample_age_desc,
        sample_age_lowest_mean = EXCLUDED.sample_age_lowest_mean,
        sample_age_highest_mean = EXCLUDED.sample_age_highest_mean,
        are_you_sure = EXCLUDED.are_you_sure,
        inclusion_exclusion_concerns = EXCLUDED.inclusion_exclusion_concerns,
        earliest_publication_year = EXCLUDED.earliest_publication_year,
        latest_publication_year = EXCLUDED.latest_publication_year,
        number_of_studies = EXCLUDED.number_of_studies,
        number_of_samples = EXCLUDED.number_of_samples,
        rating_of_low_risk_bias = EXCLUDED.rating_of_low_risk_bias,
        rating_of_moderate_risk_bias = EXCLUDED.rating_of_moderate_risk_bias,
        rating_of_high_risk_bias = EXCLUDED.rating_of_high_risk_bias,
        bias_rating_system = EXCLUDED.bias_rating_system,
        bias_rating_system_reference = EXCLUDED.bias_rating_system_reference,
        level_of_evidence_judgement_1 = EXCLUDED.level_of_evidence_judgement_1,
        level_of_evidence_judgement_2 = EXCLUDED.level_of_evidence_judgement_2,
        level_of_evidence_judgement_3 = EXCLUDED.level_of_evidence_judgement_3,
        notes = EXCLUDED.notes
"#;

/// 综述仓储
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 列出所有综述的摘要投影
    ///
    /// 不过滤不分页，顺序未指定
    pub async fn list_summaries(&self) -> Result<Vec<ReviewSummary>> {
        let summaries = sqlx::query_as::<_, ReviewSummary>(
            r#"
            SELECT id, extractor_name, extraction_date, first_author, year_of_publication
            FROM reviews
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    /// 读取一条完整的嵌套综述
    ///
    /// 综述行不存在时返回 ReviewNotFound；存在则取回四个子集合并组装
    pub async fn get_review(&self, review_id: &str) -> Result<ReviewAggregate> {
        let review = sqlx::query_as::<_, ReviewRecord>(
            r#"
            SELECT id, extractor_name, extraction_date, first_author, year_of_publication,
                   search_strategy_desc, sample_age_desc, sample_age_lowest_mean,
                   sample_age_highest_mean, are_you_sure, inclusion_exclusion_concerns,
                   earliest_publication_year, latest_publication_year, number_of_studies,
                   number_of_samples, rating_of_low_risk_bias, rating_of_moderate_risk_bias,
                   rating_of_high_risk_bias, bias_rating_system, bias_rating_system_reference,
                   level_of_evidence_judgement_1, level_of_evidence_judgement_2,
                   level_of_evidence_judgement_3, notes
            FROM reviews
            WHERE id = $1
            "#,
        )
        .bind(review_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::ReviewNotFound(review_id.to_string()))?;

        let exposures = sqlx::query_as::<_, Exposure>(
            r#"
            SELECT id, review_id, content_specifics, content_category, measure, measure_type,
                   device_type, device_category, device_portability, setting, setting_category,
                   social_environment_specific, social_environment_general
            FROM exposures
            WHERE review_id = $1
            "#,
        )
        .bind(review_id)
        .fetch_all(&self.pool)
        .await?;

        let outcomes = sqlx::query_as::<_, Outcome>(
            r#"
            SELECT id, review_id, measure, measure_type, specific_variable,
                   higher_order_variable, category
            FROM outcomes
            WHERE review_id = $1
            "#,
        )
        .bind(review_id)
        .fetch_all(&self.pool)
        .await?;

        let moderators = sqlx::query_as::<_, Moderator>(
            r#"
            SELECT id, review_id, level, category
            FROM moderators
            WHERE review_id = $1
            "#,
        )
        .bind(review_id)
        .fetch_all(&self.pool)
        .await?;

        let effect_sizes = sqlx::query_as::<_, EffectSize>(
            r#"
            SELECT review_id, exposure_id, outcome_id, moderator_id, team_narrative_summary,
                   value, value_lower_bound, value_upper_bound, p_value, statistical_test,
                   comments
            FROM effect_sizes
            WHERE review_id = $1
            "#,
        )
        .bind(review_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(aggregate::compose_review(
            review,
            exposures,
            outcomes,
            moderators,
            effect_sizes,
        ))
    }

    /// 创建或整体覆盖一条综述（PUT 保存路径）
    ///
    /// 单个事务内完成：
    /// 1. 综述行按 `review_id` upsert（以路径参数为准，不信任载荷自带的 id 字段）
    /// 2. 删除四个子集合的既有行（创建路径下为无操作）
    /// 3. 赋父 id 后按暴露 -> 结局 -> 调节变量 -> 效应量的顺序重插，空集合跳过
    #[instrument(skip(self, payload))]
    pub async fn save_review(
        &self,
        review_id: &str,
        payload: ReviewAggregate,
    ) -> Result<SaveOutcome> {
        let (mut review, mut children) = aggregate::decompose_review(payload);
        // 行键以 review_id 为准，防御载荷 id 与路径不一致
        review.id = review_id.to_string();

        aggregate::assign_parent_id(&mut children.exposures, review_id);
        aggregate::assign_parent_id(&mut children.outcomes, review_id);
        aggregate::assign_parent_id(&mut children.moderators, review_id);
        aggregate::assign_parent_id(&mut children.effect_sizes, review_id);

        let mut tx = self.pool.begin().await?;

        // 存在性探测仅用于区分创建/覆盖的日志语义，正确性由 upsert 保证
        let existed: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM reviews WHERE id = $1)")
                .bind(review_id)
                .fetch_one(&mut *tx)
                .await?;

        bind_review_fields(sqlx::query(UPSERT_REVIEW_SQL), &review)
            .execute(&mut *tx)
            .await?;

        delete_children(&mut tx, review_id).await?;
        insert_children(
            &mut tx,
            &children.exposures,
            &children.outcomes,
            &children.moderators,
            &children.effect_sizes,
        )
        .await?;

        tx.commit().await?;

        let outcome = if existed {
            SaveOutcome::Updated
        } else {
            SaveOutcome::Created
        };
        info!(review_id, ?outcome, "Review saved");

        Ok(outcome)
    }

    /// 仅创建路径（POST 遗留端点）
    ///
    /// 不做存在性判断，综述行直接插入；重复 id 由主键冲突作为存储错误浮出。
    /// 子集合写入与保存路径一致，整体在一个事务内。
    #[instrument(skip(self, payload))]
    pub async fn create_review(&self, payload: ReviewAggregate) -> Result<String> {
        let (review, mut children) = aggregate::decompose_review(payload);
        let review_id = review.id.clone();

        aggregate::assign_parent_id(&mut children.exposures, &review_id);
        aggregate::assign_parent_id(&mut children.outcomes, &review_id);
        aggregate::assign_parent_id(&mut children.moderators, &review_id);
        aggregate::assign_parent_id(&mut children.effect_sizes, &review_id);

        let mut tx = self.pool.begin().await?;

        bind_review_fields(sqlx::query(INSERT_REVIEW_SQL), &review)
            .execute(&mut *tx)
            .await?;

        insert_children(
            &mut tx,
            &children.exposures,
            &children.outcomes,
            &children.moderators,
            &children.effect_sizes,
        )
        .await?;

        tx.commit().await?;

        info!(review_id = %review_id, "Review created");

        Ok(review_id)
    }
}

/// 绑定综述行的 24 个字段（INSERT 与 UPSERT 共用同一占位符顺序）
fn bind_review_fields<'q>(
    query: sqlx::query::Query<'q, Postgres, sqlx::postgres::PgArguments>,
    review: &'q ReviewRecord,
) -> sqlx::query::Query<'q, Postgres, sqlx::postgres::PgArguments> {
    query
        .bind(&review.id)
        .bind(&review.extractor_name)
        .bind(&review.extraction_date)
        .bind(&review.first_author)
        .bind(review.year_of_publication)
        .bind(&review.search_strategy_desc)
        .bind(&review.sample_age_desc)
        .bind(review.sample_age_lowest_mean)
        .bind(review.sample_age_highest_mean)
        .bind(review.are_you_sure)
        .bind(&review.inclusion_exclusion_concerns)
        .bind(review.earliest_publication_year)
        .bind(review.latest_publication_year)
        .bind(review.number_of_studies)
        .bind(review.number_of_samples)
        .bind(review.rating_of_low_risk_bias)
        .bind(review.rating_of_moderate_risk_bias)
        .bind(review.rating_of_high_risk_bias)
        .bind(&review.bias_rating_system)
        .bind(&review.bias_rating_system_reference)
        .bind(&review.level_of_evidence_judgement_1)
        .bind(&review.level_of_evidence_judgement_2)
        .bind(&review.level_of_evidence_judgement_3)
        .bind(&review.notes)
}

/// 删除四个子集合的既有行
///
/// 四张子表互相之间没有外键依赖，删除顺序任意；保持效应量在前只是沿用习惯。
async fn delete_children(tx: &mut Transaction<'_, Postgres>, review_id: &str) -> Result<()> {
    for sql in [
        "DELETE FROM effect_sizes WHERE review_id = $1",
        "DELETE FROM exposures WHERE review_id = $1",
        "DELETE FROM outcomes WHERE review_id = $1",
        "DELETE FROM moderators WHERE review_id = $1",
    ] {
        sqlx::query(sql).bind(review_id).execute(&mut **tx).await?;
    }
    Ok(())
}

/// 插入四个子集合
///
/// 效应量按 id 引用其它子记录而非按插入顺序，物理上放在最后写入，
/// 以便在存在外键约束的存储上先落被引用行。空集合不发送任何语句。
async fn insert_children(
    tx: &mut Transaction<'_, Postgres>,
    exposures: &[Exposure],
    outcomes: &[Outcome],
    moderators: &[Moderator],
    effect_sizes: &[EffectSize],
) -> Result<()> {
    insert_exposures(tx, exposures).await?;
    insert_outcomes(tx, outcomes).await?;
    insert_moderators(tx, moderators).await?;
    insert_effect_sizes(tx, effect_sizes).await?;
    Ok(())
}

async fn insert_exposures(
    tx: &mut Transaction<'_, Postgres>,
    exposures: &[Exposure],
) -> Result<()> {
    for exposure in exposures {
        sqlx::query(
            r#"
            INSERT INTO exposures (
                id, review_id, content_specifics, content_category, measure, measure_type,
                device_type, device_category, device_portability, setting, setting_category,
                social_environment_specific, social_environment_general
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(&exposure.id)
        .bind(&exposure.review_id)
        .bind(&exposure.content_specifics)
        .bind(&exposure.content_category)
        .bind(&exposure.measure)
        .bind(&exposure.measure_type)
        .bind(&exposure.device_type)
        .bind(&exposure.device_category)
        .bind(&exposure.device_portability)
        .bind(&exposure.setting)
        .bind(&exposure.setting_category)
        .bind(&exposure.social_environment_specific)
        .bind(&exposure.social_environment_general)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn insert_outcomes(tx: &mut Transaction<'_, Postgres>, outcomes: &[Outcome]) -> Result<()> {
    for outcome in outcomes {
        sqlx::query(
            r#"
            INSERT INTO outcomes (
                id, review_id, measure, measure_type, specific_variable,
                higher_order_variable, category
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&outcome.id)
        .bind(&outcome.review_id)
        .bind(&outcome.measure)
        .bind(&outcome.measure_type)
        .bind(&outcome.specific_variable)
        .bind(&outcome.higher_order_variable)
        .bind(&outcome.category)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn insert_moderators(
    tx: &mut Transaction<'_, Postgres>,
    moderators: &[Moderator],
) -> Result<()> {
    for moderator in moderators {
        sqlx::query(
            r#"
            INSERT INTO moderators (id, review_id, level, category)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&moderator.id)
        .bind(&moderator.review_id)
        .bind(&moderator.level)
        .bind(&moderator.category)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn insert_effect_sizes(
    tx: &mut Transaction<'_, Postgres>,
    effect_sizes: &[EffectSize],
) -> Result<()> {
    for effect_size in effect_sizes {
        sqlx::query(
            r#"
            INSERT INTO effect_sizes (
                review_id, exposure_id, outcome_id, moderator_id, team_narrative_summary,
                value, value_lower_bound, value_upper_bound, p_value, statistical_test, comments
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(&effect_size.review_id)
        .bind(&effect_size.exposure_id)
        .bind(&effect_size.outcome_id)
        .bind(&effect_size.moderator_id)
        .bind(&effect_size.team_narrative_summary)
        .bind(effect_size.value)
        .bind(effect_size.value_lower_bound)
        .bind(effect_size.value_upper_bound)
        .bind(effect_size.p_value)
        .bind(&effect_size.statistical_test)
        .bind(&effect_size.comments)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
