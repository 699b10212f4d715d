//! フレームadmission制御モジュール
//!
//! 検出器に対して在飛行フレームを常に最大1枚に抑えるバックプレッシャ制御。
//! キューは持たない: 在飛行中に届いたフレームはソース側で即座に破棄され、
//! オーバーレイのレイテンシは入力レートではなく検出器スループットに従う。

use crate::domain::types::Frame;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// admission判定の結果
#[derive(Debug)]
pub enum AdmissionDecision {
    /// 受理された。在飛行permitとフレームの組を保持する
    Admitted(AdmittedFrame),
    /// 破棄された。フレームは判定時点で既に解放済み
    Dropped,
}

/// 受理されたフレームと在飛行permitの組
///
/// permitのDropで在飛行状態がクリアされるため、検出成功・失敗・
/// パニックのどの経路でも次のadmissionが必ず再開される。
#[derive(Debug)]
pub struct AdmittedFrame {
    pub frame: Frame,
    pub permit: InFlightPermit,
}

/// 在飛行permit（RAII）
///
/// Dropで在飛行フラグをクリアする。cloneは不可（在飛行は単一）。
#[derive(Debug)]
pub struct InFlightPermit {
    in_flight: Arc<AtomicBool>,
}

impl Drop for InFlightPermit {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

/// フレームadmissionコントローラ
///
/// `Arc<AtomicBool>`によるロックフリー設計で、admission判定は
/// 同期・非ブロッキング（ソースを待たせず、破棄するだけ）。
#[derive(Clone)]
pub struct FrameAdmissionController {
    in_flight: Arc<AtomicBool>,
}

impl FrameAdmissionController {
    /// 新しいコントローラを作成（在飛行なし）
    pub fn new() -> Self {
        Self {
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// フレームのadmission判定を行う
    ///
    /// keep-only-latestポリシー: 既に1枚が在飛行中なら新しいフレームを
    /// 即座に破棄（= 解放）して `Dropped` を返す。そうでなければ
    /// 在飛行フラグを立てて `Admitted` を返す。
    pub fn try_admit(&self, frame: Frame) -> AdmissionDecision {
        match self
            .in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
        {
            Ok(_) => AdmissionDecision::Admitted(AdmittedFrame {
                frame,
                permit: InFlightPermit {
                    in_flight: Arc::clone(&self.in_flight),
                },
            }),
            Err(_) => {
                // 在飛行中: frameはここでmove済みなのでスコープ終端で解放される
                drop(frame);
                AdmissionDecision::Dropped
            }
        }
    }

    /// 現在フレームが在飛行中か確認（ロックフリー）
    #[inline]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl Default for FrameAdmissionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_frame() -> Frame {
        Frame::new(vec![0u8; 16], 4, 4, 0)
    }

    #[test]
    fn test_admit_when_idle() {
        let controller = FrameAdmissionController::new();
        assert!(!controller.is_in_flight());

        let decision = controller.try_admit(test_frame());
        assert!(matches!(decision, AdmissionDecision::Admitted(_)));
        assert!(controller.is_in_flight());
    }

    #[test]
    fn test_drop_while_in_flight() {
        let controller = FrameAdmissionController::new();

        let admitted = match controller.try_admit(test_frame()) {
            AdmissionDecision::Admitted(a) => a,
            AdmissionDecision::Dropped => panic!("first frame must be admitted"),
        };

        // 在飛行中のN回の到着はすべて破棄される
        for _ in 0..10 {
            let decision = controller.try_admit(test_frame());
            assert!(matches!(decision, AdmissionDecision::Dropped));
        }

        drop(admitted);
        assert!(!controller.is_in_flight());
    }

    #[test]
    fn test_permit_release_reopens_admission() {
        let controller = FrameAdmissionController::new();

        let first = match controller.try_admit(test_frame()) {
            AdmissionDecision::Admitted(a) => a,
            AdmissionDecision::Dropped => panic!("first frame must be admitted"),
        };
        assert!(matches!(
            controller.try_admit(test_frame()),
            AdmissionDecision::Dropped
        ));

        // permitの解放で次のadmissionが再開される
        drop(first);
        assert!(matches!(
            controller.try_admit(test_frame()),
            AdmissionDecision::Admitted(_)
        ));
    }

    #[test]
    fn test_permit_released_on_panic_path() {
        let controller = FrameAdmissionController::new();

        let result = std::panic::catch_unwind({
            let controller = controller.clone();
            move || {
                let _admitted = match controller.try_admit(test_frame()) {
                    AdmissionDecision::Admitted(a) => a,
                    AdmissionDecision::Dropped => panic!("first frame must be admitted"),
                };
                panic!("simulated detector panic");
            }
        });

        assert!(result.is_err());
        // パニック経路でもpermitはDropされ、在飛行状態がクリアされる
        assert!(!controller.is_in_flight());
    }
}
