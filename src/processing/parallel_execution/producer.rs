// Producer - 作業キューの事前投入

use crate::core::Frame;
use tokio::sync::mpsc;

/// 全フレームを投入済みの作業キューを作成する
///
/// 送信側はここでドロップされるため、キューが空になると `recv` は `None` を返す。
pub fn fill_work_queue(frames: Vec<Frame>) -> mpsc::UnboundedReceiver<Frame> {
    let (work_tx, work_rx) = mpsc::unbounded_channel();

    for frame in frames {
        // 受信側は手元にあるので失敗しない
        let _ = work_tx.send(frame);
    }

    work_rx
}
