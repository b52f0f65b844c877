//! 报表列定义
//!
//! 两份报表的固定列集合：源列到人类可读表头的命名映射（按声明顺序输出）、
//! 对应的只读查询 SQL，以及结果行到 CSV 单元格的转换。
//! 表头文案沿用数据录入界面的字段标签。

use sqlx::FromRow;

/// 报表结果行：按表头声明顺序渲染为一行单元格
pub trait ReportRow {
    fn cells(&self) -> Vec<String>;
}

// ==================== 综述报表 ====================

/// 综述报表表头（与 `ReviewReportRow::cells` 严格同序）
pub const REVIEWS_REPORT_HEADERS: &[&str] = &[
    "Review ID",
    "Extractor Name",
    "Extraction Date",
    "First Author",
    "Year of Publication",
    "Search strategy description",
    "Sample age - description",
    "Sample age - lowest study mean",
    "Sample age - highest study mean",
    "Meets inclusion criteria",
    "Inclusion/exclusion concerns",
    "Earliest study publication year",
    "Latest study publication year",
    "k (number of studies)",
    "N (combined sample across studies)",
    "% low risk of bias studies",
    "% moderate risk of bias studies",
    "% high risk of bias studies",
    "Risk of bias rating system",
    "Risk of bias rating system reference",
    "Level of Evidence Judgement 1",
    "Level of Evidence Judgement 2",
    "Level of Evidence Judgement 3",
    "Notes",
];

/// 综述报表查询：单表投影，每条综述一行，无连接
pub const REVIEWS_REPORT_SQL: &str = r#"
    SELECT id, extractor_name, extraction_date, first_author, year_of_publication,
           search_strategy_desc, sample_age_desc, sample_age_lowest_mean,
           sample_age_highest_mean, are_you_sure, inclusion_exclusion_concerns,
           earliest_publication_year, latest_publication_year, number_of_studies,
           number_of_samples, rating_of_low_risk_bias, rating_of_moderate_risk_bias,
           rating_of_high_risk_bias, bias_rating_system, bias_rating_system_reference,
           level_of_evidence_judgement_1, level_of_evidence_judgement_2,
           level_of_evidence_judgement_3, notes
    FROM reviews
"#;

/// 综述报表结果行
#[derive(Debug, FromRow)]
pub struct ReviewReportRow {
    pub id: String,
    pub extractor_name: String,
    pub extraction_date: String,
    pub first_author: String,
    pub year_of_publication: Option<i32>,
    pub search_strategy_desc: String,
    pub sample_age_desc: String,
    pub sample_age_lowest_mean: Option<f64>,
    pub sample_age_highest_mean: Option<f64>,
    pub are_you_sure: Option<bool>,
    pub inclusion_exclusion_concerns: String,
    pub earliest_publication_year: Option<i32>,
    pub latest_publication_year: Option<i32>,
    pub number_of_studies: Option<i32>,
    pub number_of_samples: Option<i32>,
    pub rating_of_low_risk_bias: Option<f64>,
    pub rating_of_moderate_risk_bias: Option<f64>,
    pub rating_of_high_risk_bias: Option<f64>,
    pub bias_rating_system: String,
    pub bias_rating_system_reference: String,
    pub level_of_evidence_judgement_1: String,
    pub level_of_evidence_judgement_2: String,
    pub level_of_evidence_judgement_3: String,
    pub notes: String,
}

impl ReportRow for ReviewReportRow {
    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.extractor_name.clone(),
            self.extraction_date.clone(),
            self.first_author.clone(),
            opt_cell(self.year_of_publication),
            self.search_strategy_desc.clone(),
            self.sample_age_desc.clone(),
            opt_cell(self.sample_age_lowest_mean),
            opt_cell(self.sample_age_highest_mean),
            opt_cell(self.are_you_sure),
            self.inclusion_exclusion_concerns.clone(),
            opt_cell(self.earliest_publication_year),
            opt_cell(self.latest_publication_year),
            opt_cell(self.number_of_studies),
            opt_cell(self.number_of_samples),
            opt_cell(self.rating_of_low_risk_bias),
            opt_cell(self.rating_of_moderate_risk_bias),
            opt_cell(self.rating_of_high_risk_bias),
            self.bias_rating_system.clone(),
            self.bias_rating_system_reference.clone(),
            self.level_of_evidence_judgement_1.clone(),
            self.level_of_evidence_judgement_2.clone(),
            self.level_of_evidence_judgement_3.clone(),
            self.notes.clone(),
        ]
    }
}

// ==================== 效应量报表 ====================

/// 效应量报表表头（与 `EffectSizeReportRow::cells` 严格同序）
pub const EFFECT_SIZES_REPORT_HEADERS: &[&str] = &[
    "Review ID",
    "Exposure content specifics",
    "Exposure content category",
    "Exposure measure",
    "Exposure measure type",
    "Exposure device type",
    "Exposure device category",
    "Exposure device portability",
    "Exposure setting",
    "Exposure setting category",
    "Specific social environment",
    "General social environment",
    "Outcome measure",
    "Outcome measure type",
    "Outcome specific variable",
    "Outcome higher-order variable",
    "Outcome category",
    "Moderator level",
    "Moderator category",
    "Team narrative summary",
    "Value",
    "Value CI lower bound",
    "Value CI upper bound",
    "p-value",
    "Statistical test",
    "Comments",
];

/// 效应量报表查询：effect_sizes 与三张子表的四表内连接。
/// 内连接意味着 exposure_id/outcome_id/moderator_id 为 NULL 或悬空的
/// 效应量行会被静默排除——这是沿用的既有行为，改为 LEFT JOIN 前请先确认下游。
pub const EFFECT_SIZES_REPORT_SQL: &str = r#"
    SELECT es.review_id,
           ex.content_specifics, ex.content_category,
           ex.measure AS exposure_measure, ex.measure_type AS exposure_measure_type,
           ex.device_type, ex.device_category, ex.device_portability,
           ex.setting, ex.setting_category,
           ex.social_environment_specific, ex.social_environment_general,
           o.measure AS outcome_measure, o.measure_type AS outcome_measure_type,
           o.specific_variable, o.higher_order_variable, o.category AS outcome_category,
           m.level AS moderator_level, m.category AS moderator_category,
           es.team_narrative_summary, es.value, es.value_lower_bound,
           es.value_upper_bound, es.p_value, es.statistical_test, es.comments
    FROM effect_sizes es
    INNER JOIN exposures ex ON ex.id = es.exposure_id
    INNER JOIN outcomes o ON o.id = es.outcome_id
    INNER JOIN moderators m ON m.id = es.moderator_id
"#;

/// 效应量报表结果行
#[derive(Debug, FromRow)]
pub struct EffectSizeReportRow {
    pub review_id: Option<String>,
    pub content_specifics: String,
    pub content_category: String,
    pub exposure_measure: String,
    pub exposure_measure_type: String,
    pub device_type: String,
    pub device_category: String,
    pub device_portability: String,
    pub setting: String,
    pub setting_category: String,
    pub social_environment_specific: String,
    pub social_environment_general: String,
    pub outcome_measure: String,
    pub outcome_measure_type: String,
    pub specific_variable: String,
    pub higher_order_variable: String,
    pub outcome_category: String,
    pub moderator_level: String,
    pub moderator_category: String,
    pub team_narrative_summary: String,
    pub value: Option<f64>,
    pub value_lower_bound: Option<f64>,
    pub value_upper_bound: Option<f64>,
    pub p_value: Option<f64>,
    pub statistical_test: String,
    pub comments: String,
}

impl ReportRow for EffectSizeReportRow {
    fn cells(&self) -> Vec<String> {
        vec![
            self.review_id.clone().unwrap_or_default(),
            self.content_specifics.clone(),
            self.content_category.clone(),
            self.exposure_measure.clone(),
            self.exposure_measure_type.clone(),
            self.device_type.clone(),
            self.device_category.clone(),
            self.device_portability.clone(),
            self.setting.clone(),
            self.setting_category.clone(),
            self.social_environment_specific.clone(),
            self.social_environment_general.clone(),
            self.outcome_measure.clone(),
            self.outcome_measure_type.clone(),
            self.specific_variable.clone(),
            self.higher_order_variable.clone(),
            self.outcome_category.clone(),
            self.moderator_level.clone(),
            self.moderator_category.clone(),
            self.team_narrative_summary.clone(),
            opt_cell(self.value),
            opt_cell(self.value_lower_bound),
            opt_cell(self.value_upper_bound),
            opt_cell(self.p_value),
            self.statistical_test.clone(),
            self.comments.clone(),
        ]
    }
}

/// 可空标量的单元格渲染：NULL 输出为空串
fn opt_cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_review_row() -> ReviewReportRow {
        ReviewReportRow {
            id: "r1".into(),
            extractor_name: "AB".into(),
            extraction_date: "2020-01-01".into(),
            first_author: "Smith".into(),
            year_of_publication: Some(2019),
            search_strategy_desc: String::new(),
            sample_age_desc: String::new(),
            sample_age_lowest_mean: Some(11.5),
            sample_age_highest_mean: None,
            are_you_sure: Some(true),
            inclusion_exclusion_concerns: String::new(),
            earliest_publication_year: None,
            latest_publication_year: None,
            number_of_studies: Some(12),
            number_of_samples: None,
            rating_of_low_risk_bias: None,
            rating_of_moderate_risk_bias: None,
            rating_of_high_risk_bias: None,
            bias_rating_system: String::new(),
            bias_rating_system_reference: String::new(),
            level_of_evidence_judgement_1: String::new(),
            level_of_evidence_judgement_2: String::new(),
            level_of_evidence_judgement_3: String::new(),
            notes: String::new(),
        }
    }

    fn sample_effect_size_row() -> EffectSizeReportRow {
        EffectSizeReportRow {
            review_id: Some("r1".into()),
            content_specifics: "social media".into(),
            content_category: String::new(),
            exposure_measure: String::new(),
            exposure_measure_type: String::new(),
            device_type: String::new(),
            device_category: String::new(),
            device_portability: String::new(),
            setting: String::new(),
            setting_category: String::new(),
            social_environment_specific: String::new(),
            social_environment_general: String::new(),
            outcome_measure: String::new(),
            outcome_measure_type: String::new(),
            specific_variable: String::new(),
            higher_order_variable: String::new(),
            outcome_category: String::new(),
            moderator_level: String::new(),
            moderator_category: String::new(),
            team_narrative_summary: String::new(),
            value: Some(0.35),
            value_lower_bound: None,
            value_upper_bound: None,
            p_value: Some(0.01),
            statistical_test: String::new(),
            comments: String::new(),
        }
    }

    /// 单元格数与表头数不一致会让整份 CSV 错列，必须锁定
    #[test]
    fn test_review_cells_match_header_count() {
        assert_eq!(
            sample_review_row().cells().len(),
            REVIEWS_REPORT_HEADERS.len()
        );
    }

    #[test]
    fn test_effect_size_cells_match_header_count() {
        assert_eq!(
            sample_effect_size_row().cells().len(),
            EFFECT_SIZES_REPORT_HEADERS.len()
        );
    }

    #[test]
    fn test_null_scalars_render_as_empty_cells() {
        let row = sample_review_row();
        let cells = row.cells();
        // sample_age_highest_mean 为 NULL，对应第 9 列（0 起）应为空串
        assert_eq!(cells[8], "");
        assert_eq!(cells[7], "11.5");
        assert_eq!(cells[9], "true");
    }
}
