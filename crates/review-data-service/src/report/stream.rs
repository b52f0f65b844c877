//! 批量 CSV 流
//!
//! 把拉取式的行流接到推送式的分批 CSV 编码器上，产出文本块流：
//! - 表头行只出现在第一个块里
//! - 每累积 batch_size 行输出一个块，结尾的不满批次也会输出
//! - 零行结果仍输出一个只含表头的块
//! - 单趟前向流，不可重放；消费方中途放弃时随流一起丢弃即可

use async_stream::try_stream;
use bytes::Bytes;
use futures::{Stream, StreamExt, pin_mut};

use crate::error::{Result, ServiceError};

/// 把行流编码为分批的 CSV 文本块流
///
/// `rows` 的每个元素是一行按列序排好的单元格；含分隔符、引号或换行的
/// 单元格由 csv crate 按标准转义规则加引号，除此之外不做任何编码变换。
pub fn csv_chunks<S>(
    headers: &'static [&'static str],
    rows: S,
    batch_size: usize,
) -> impl Stream<Item = Result<Bytes>>
where
    S: Stream<Item = Result<Vec<String>>>,
{
    try_stream! {
        let batch_size = batch_size.max(1);

        // 表头写进首个缓冲，之后的批次不再带表头
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(headers).map_err(ServiceError::from)?;

        let mut rows_in_batch = 0usize;
        let mut emitted_any = false;

        pin_mut!(rows);
        while let Some(row) = rows.next().await {
            let row = row?;
            writer.write_record(&row).map_err(ServiceError::from)?;
            rows_in_batch += 1;

            if rows_in_batch == batch_size {
                yield Bytes::from(finish_batch(writer)?);
                emitted_any = true;
                writer = csv::Writer::from_writer(Vec::new());
                rows_in_batch = 0;
            }
        }

        // 结尾的不满批次；零行结果也要吐出只含表头的块
        if rows_in_batch > 0 || !emitted_any {
            yield Bytes::from(finish_batch(writer)?);
        }
    }
}

/// 结束一个批次，取回编码好的字节
fn finish_batch(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| ServiceError::Csv(e.to_string()))
}
