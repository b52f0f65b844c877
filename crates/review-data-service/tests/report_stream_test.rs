//! 报表流集成测试
//!
//! 使用真实 PostgreSQL 验证两条 CSV 报表流水线的端到端行为：
//! 表头唯一性、行内容、内连接对悬空引用的排除。
//!
//! ## 运行方式
//!
//! ```bash
//! DATABASE_URL=postgres://... cargo test --test report_stream_test -- --ignored
//! ```

use futures::StreamExt;
use review_data_service::{ReportStreamer, ReviewAggregate, ReviewRepository};
use sqlx::PgPool;
use uuid::Uuid;

// ==================== 辅助函数 ====================

fn database_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests")
}

async fn setup_pool() -> PgPool {
    PgPool::connect(&database_url())
        .await
        .expect("数据库连接失败")
}

fn fresh_id() -> String {
    format!("it-{}", Uuid::new_v4())
}

/// 把报表流收集为完整文本（仅测试用，生产路径保持流式）
async fn collect_csv(
    stream: impl futures::Stream<Item = review_data_service::Result<bytes::Bytes>>,
) -> String {
    let chunks: Vec<_> = stream.collect().await;
    let mut text = String::new();
    for chunk in chunks {
        let chunk = chunk.expect("报表流不应报错");
        text.push_str(std::str::from_utf8(&chunk).expect("CSV 块不是合法 UTF-8"));
    }
    text
}

fn aggregate_from_json(json: serde_json::Value) -> ReviewAggregate {
    serde_json::from_value(json).expect("聚合载荷反序列化失败")
}

// ==================== 综述报表 ====================

#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_reviews_report_contains_header_once_and_seeded_row() {
    let pool = setup_pool().await;
    let repo = ReviewRepository::new(pool.clone());
    let review_id = fresh_id();
    // 用独一无二的作者名作为行标记
    let marker = format!("author-{}", Uuid::new_v4());

    repo.create_review(aggregate_from_json(serde_json::json!({
        "id": review_id,
        "first_author": marker,
        "number_of_studies": 7
    })))
    .await
    .expect("创建失败");

    let streamer = ReportStreamer::new(pool, 1000);
    let csv_text = collect_csv(streamer.reviews_csv()).await;

    // 表头在整份输出中恰好出现一次，且在开头
    assert!(csv_text.starts_with("Review ID,Extractor Name"));
    assert_eq!(csv_text.matches("Review ID,Extractor Name").count(), 1);

    let row = csv_text
        .lines()
        .find(|line| line.contains(&marker))
        .expect("报表应包含新建综述行");
    assert!(row.contains(&review_id));
    assert!(row.contains(",7,"));
}

// ==================== 效应量报表 ====================

#[tokio::test]
#[ignore]
async fn test_effect_sizes_report_joins_all_four_tables() {
    let pool = setup_pool().await;
    let repo = ReviewRepository::new(pool.clone());
    let review_id = fresh_id();
    let marker = format!("narrative-{}", Uuid::new_v4());

    repo.create_review(aggregate_from_json(serde_json::json!({
        "id": review_id,
        "exposures": [{"id": format!("{review_id}-e1"), "content_specifics": "social media"}],
        "outcomes": [{"id": format!("{review_id}-o1"), "measure": "PHQ-9"}],
        "moderators": [{"id": format!("{review_id}-m1"), "level": "age"}],
        "effect_sizes": [{
            "exposure_id": format!("{review_id}-e1"),
            "outcome_id": format!("{review_id}-o1"),
            "moderator_id": format!("{review_id}-m1"),
            "team_narrative_summary": marker,
            "value": 0.35
        }]
    })))
    .await
    .expect("创建失败");

    let streamer = ReportStreamer::new(pool, 1000);
    let csv_text = collect_csv(streamer.effect_sizes_csv()).await;

    assert!(csv_text.starts_with("Review ID,Exposure content specifics"));

    let row = csv_text
        .lines()
        .find(|line| line.contains(&marker))
        .expect("报表应包含连接成功的效应量行");
    // 四张表的字段都应出现在同一行
    assert!(row.contains(&review_id));
    assert!(row.contains("social media"));
    assert!(row.contains("PHQ-9"));
    assert!(row.contains("age"));
    assert!(row.contains("0.35"));
}

#[tokio::test]
#[ignore]
async fn test_effect_sizes_report_excludes_unmatched_refs() {
    let pool = setup_pool().await;
    let repo = ReviewRepository::new(pool.clone());
    let review_id = fresh_id();
    let matched_marker = format!("matched-{}", Uuid::new_v4());
    let dangling_marker = format!("dangling-{}", Uuid::new_v4());

    // 第二条效应量的 exposure_id 不指向任何暴露行：内连接应将其静默排除
    repo.create_review(aggregate_from_json(serde_json::json!({
        "id": review_id,
        "exposures": [{"id": format!("{review_id}-e1")}],
        "outcomes": [{"id": format!("{review_id}-o1")}],
        "moderators": [{"id": format!("{review_id}-m1")}],
        "effect_sizes": [
            {
                "exposure_id": format!("{review_id}-e1"),
                "outcome_id": format!("{review_id}-o1"),
                "moderator_id": format!("{review_id}-m1"),
                "team_narrative_summary": matched_marker
            },
            {
                "exposure_id": format!("{review_id}-missing"),
                "outcome_id": format!("{review_id}-o1"),
                "moderator_id": format!("{review_id}-m1"),
                "team_narrative_summary": dangling_marker
            }
        ]
    })))
    .await
    .expect("创建失败");

    let streamer = ReportStreamer::new(pool.clone(), 1000);
    let csv_text = collect_csv(streamer.effect_sizes_csv()).await;

    assert!(csv_text.contains(&matched_marker), "连接成功的行应在报表中");
    assert!(
        !csv_text.contains(&dangling_marker),
        "悬空引用的行应被内连接排除"
    );

    // 悬空行本身仍在存储中（排除只发生在报表层）
    let aggregate = repo.get_review(&review_id).await.expect("读取失败");
    assert_eq!(aggregate.effect_sizes.len(), 2);
}

#[tokio::test]
#[ignore]
async fn test_effect_sizes_report_excludes_null_refs() {
    let pool = setup_pool().await;
    let repo = ReviewRepository::new(pool.clone());
    let review_id = fresh_id();
    let null_ref_marker = format!("nullref-{}", Uuid::new_v4());

    // 三个引用全部缺省为 NULL 的效应量行
    repo.create_review(aggregate_from_json(serde_json::json!({
        "id": review_id,
        "effect_sizes": [{"team_narrative_summary": null_ref_marker}]
    })))
    .await
    .expect("创建失败");

    let streamer = ReportStreamer::new(pool, 1000);
    let csv_text = collect_csv(streamer.effect_sizes_csv()).await;

    assert!(
        !csv_text.contains(&null_ref_marker),
        "引用为 NULL 的行应被内连接排除"
    );
}
