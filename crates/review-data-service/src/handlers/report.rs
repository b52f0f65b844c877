//! 报表 API 处理器
//!
//! 两份 CSV 报表的流式下载端点。响应体是前向字节流，
//! 行从存储逐批取出并即时写出，不在内存里物化完整结果集。

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{report::ReportStreamer, state::AppState};

/// 综述报表
///
/// GET /reports/reviews
pub async fn reviews_report(State(state): State<AppState>) -> Response {
    let streamer = ReportStreamer::new(state.pool.clone(), state.report.batch_size);
    csv_response("reviews.csv", streamer.reviews_csv())
}

/// 效应量报表
///
/// GET /reports/effect_sizes
pub async fn effect_sizes_report(State(state): State<AppState>) -> Response {
    let streamer = ReportStreamer::new(state.pool.clone(), state.report.batch_size);
    csv_response("effect_sizes.csv", streamer.effect_sizes_csv())
}

/// 组装 CSV 流式响应
fn csv_response<S>(filename: &str, stream: S) -> Response
where
    S: futures::Stream<Item = crate::error::Result<bytes::Bytes>> + Send + 'static,
{
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        "text/csv; charset=utf-8".parse().unwrap(),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{}\"", filename)
            .parse()
            .unwrap(),
    );

    (StatusCode::OK, headers, Body::from_stream(stream)).into_response()
}
