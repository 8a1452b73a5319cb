//! 재표본 조합자가 사용하는 구간 버퍼.

use std::sync::OnceLock;

use super::Process;

struct Window<T> {
    values: Vec<T>,
    rest: Process<T>,
}

/// 원본 프로세스에서 `frequency`개를 소비한 결과를 처음 필요할 때 한 번 계산합니다.
///
/// 값 계산과 다음 노드 생성이 같은 소비 결과를 공유하므로 원본이 두 번 진행되지
/// 않습니다. 캐시는 이 구간에만 속하며 다음 구간으로 이어지지 않습니다.
pub(super) struct LazyWindow<T> {
    source: Process<T>,
    frequency: usize,
    cell: OnceLock<Window<T>>,
}

impl<T: Clone + Send + Sync + 'static> LazyWindow<T> {
    pub(super) fn new(source: Process<T>, frequency: usize) -> Self {
        Self {
            source,
            frequency,
            cell: OnceLock::new(),
        }
    }

    fn window(&self) -> &Window<T> {
        self.cell.get_or_init(|| {
            let mut values = Vec::with_capacity(self.frequency);
            let mut current = self.source.clone();
            for _ in 0..self.frequency {
                values.push(current.value().clone());
                current = current.evolve();
            }
            Window {
                values,
                rest: current,
            }
        })
    }

    pub(super) fn values(&self) -> &[T] {
        &self.window().values
    }

    pub(super) fn rest(&self) -> &Process<T> {
        &self.window().rest
    }
}
