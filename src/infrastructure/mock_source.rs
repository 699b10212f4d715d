//! モックフレームソースアダプター
//!
//! カメラデバイスなしでパイプラインを駆動するための合成フレーム供給源。
//! 固定間隔で単色フレームを生成し、生成上限に達するとストリーム終端を返します。

use crate::domain::{
    error::DomainResult,
    ports::FrameSourcePort,
    types::Frame,
};
use std::time::Duration;

/// 合成フレームを供給するアダプター
pub struct MockFrameSourceAdapter {
    width: u32,
    height: u32,
    tick_interval: Duration,
    /// 供給上限（0は無制限）
    frame_limit: u64,
    produced: u64,
}

impl MockFrameSourceAdapter {
    pub fn new(width: u32, height: u32, tick_interval: Duration, frame_limit: u64) -> Self {
        Self {
            width,
            height,
            tick_interval,
            frame_limit,
            produced: 0,
        }
    }

    /// 生成済みフレーム数
    #[allow(dead_code)]
    pub fn produced(&self) -> u64 {
        self.produced
    }
}

impl FrameSourcePort for MockFrameSourceAdapter {
    fn next_frame(&mut self) -> DomainResult<Option<Frame>> {
        if self.frame_limit > 0 && self.produced >= self.frame_limit {
            return Ok(None);
        }

        if !self.tick_interval.is_zero() {
            std::thread::sleep(self.tick_interval);
        }

        // グレースケール単色（フレーム番号で輝度が巡回する）
        let luma = (self.produced % 256) as u8;
        let data = vec![luma; (self.width * self.height) as usize];
        self.produced += 1;

        Ok(Some(Frame::new(data, self.width, self.height, 0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_produces_frames_up_to_limit() {
        let mut source = MockFrameSourceAdapter::new(4, 4, Duration::ZERO, 3);

        for _ in 0..3 {
            let frame = source.next_frame().expect("next_frame");
            assert!(frame.is_some());
        }
        assert!(source.next_frame().expect("next_frame").is_none());
        assert_eq!(source.produced(), 3);
    }

    #[test]
    fn test_unlimited_when_limit_zero() {
        let mut source = MockFrameSourceAdapter::new(4, 4, Duration::ZERO, 0);

        for _ in 0..100 {
            assert!(source.next_frame().expect("next_frame").is_some());
        }
    }

    #[test]
    fn test_frame_dimensions() {
        let mut source = MockFrameSourceAdapter::new(8, 6, Duration::ZERO, 1);

        let frame = source.next_frame().expect("next_frame").expect("frame");
        assert_eq!(frame.width, 8);
        assert_eq!(frame.height, 6);
        assert_eq!(frame.data.len(), 48);
    }
}
