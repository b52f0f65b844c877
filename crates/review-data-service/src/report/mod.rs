//! 报表模块
//!
//! 两条只读报表流水线：从存储增量拉取结果行（游标式 fetch，
//! 绝不整表载入内存），映射为单元格后交给分批 CSV 编码器，
//! 产出可直接接到 HTTP 响应体上的前向字节流。

pub mod columns;
pub mod stream;

use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use sqlx::PgPool;
use sqlx::postgres::PgRow;

use crate::error::Result;
use columns::{
    EFFECT_SIZES_REPORT_HEADERS, EFFECT_SIZES_REPORT_SQL, EffectSizeReportRow, ReportRow,
    REVIEWS_REPORT_HEADERS, REVIEWS_REPORT_SQL, ReviewReportRow,
};

/// 报表流送器
#[derive(Clone)]
pub struct ReportStreamer {
    pool: PgPool,
    batch_size: usize,
}

impl ReportStreamer {
    pub fn new(pool: PgPool, batch_size: usize) -> Self {
        Self { pool, batch_size }
    }

    /// 综述报表：每条综述一行的单表投影
    pub fn reviews_csv(&self) -> impl Stream<Item = Result<Bytes>> + Send + 'static {
        stream::csv_chunks(
            REVIEWS_REPORT_HEADERS,
            row_cells_stream::<ReviewReportRow>(self.pool.clone(), REVIEWS_REPORT_SQL),
            self.batch_size,
        )
    }

    /// 效应量报表：四表内连接的扁平视图
    pub fn effect_sizes_csv(&self) -> impl Stream<Item = Result<Bytes>> + Send + 'static {
        stream::csv_chunks(
            EFFECT_SIZES_REPORT_HEADERS,
            row_cells_stream::<EffectSizeReportRow>(self.pool.clone(), EFFECT_SIZES_REPORT_SQL),
            self.batch_size,
        )
    }
}

/// 把查询结果逐行映射为单元格流
///
/// 用 sqlx 的游标式 fetch 逐行取回，消费方丢弃流时游标随之清理。
fn row_cells_stream<R>(
    pool: PgPool,
    sql: &'static str,
) -> impl Stream<Item = Result<Vec<String>>> + Send + 'static
where
    R: for<'r> sqlx::FromRow<'r, PgRow> + ReportRow + Send + Unpin + 'static,
{
    async_stream::try_stream! {
        let mut rows = sqlx::query_as::<_, R>(sql).fetch(&pool);
        while let Some(row) = rows.try_next().await? {
            yield row.cells();
        }
    }
}
