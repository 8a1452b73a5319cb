//! 지연 평가되는 무한 프로세스.
//!
//! `Process<T>`는 현재 값과 다음 노드를 만드는 순수 연산을 가진 불변 노드입니다.
//! 같은 노드는 항상 같은 값을 내고, `evolve()`를 몇 번 호출해도 같은 값을 가진
//! 다음 노드를 돌려줍니다. 노드는 `Arc`로 공유되므로 하나의 프로세스를 여러
//! 조합자가 함께 사용해도 서로의 진행에 영향을 주지 않습니다.
//!
//! # 주요 기능
//!
//! - **생성**: [`Process::constant`], [`Process::fold`], [`Process::unfold`], [`count`]
//! - **변환**: [`Process::map`], [`Process::zip`], [`Process::sequence`]
//! - **재표본**: [`Process::sample`] (스냅샷), [`Process::aggregate`] (누적)
//! - **구체화**: [`Process::take`], [`Process::iter`]
//!
//! # 예시
//!
//! ```rust
//! use esg_core::process::{count, Process};
//!
//! let shifted = count(0).map(|n| n + 3);
//! assert_eq!(shifted.take(5), vec![3, 4, 5, 6, 7]);
//!
//! let quarterly = count(1).aggregate(3, |window| window.iter().sum()).unwrap();
//! assert_eq!(quarterly.take(2), vec![6, 15]);
//! ```

mod window;

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::error::{EsgError, EsgResult};

use window::LazyWindow;

type Evolve<T> = Arc<dyn Fn() -> Process<T> + Send + Sync>;
type Thunk<T> = Box<dyn Fn() -> T + Send + Sync>;

/// 노드의 현재 값. 지연 값은 처음 읽을 때 한 번만 계산되어 해당 노드에 저장됩니다.
enum Head<T> {
    Ready(T),
    Deferred { cell: OnceLock<T>, thunk: Thunk<T> },
}

impl<T> Head<T> {
    fn get(&self) -> &T {
        match self {
            Head::Ready(value) => value,
            Head::Deferred { cell, thunk } => cell.get_or_init(|| thunk()),
        }
    }
}

/// 다음 노드를 만드는 방법. 상수 노드는 자기 자신을 돌려주므로 참조 순환이 없습니다.
enum Step<T> {
    Constant,
    Evolve(Evolve<T>),
}

impl<T> Clone for Step<T> {
    fn clone(&self) -> Self {
        match self {
            Step::Constant => Step::Constant,
            Step::Evolve(next) => Step::Evolve(Arc::clone(next)),
        }
    }
}

/// 지연 평가되는 무한 프로세스의 한 노드.
pub struct Process<T> {
    head: Arc<Head<T>>,
    step: Step<T>,
}

impl<T> Clone for Process<T> {
    fn clone(&self) -> Self {
        Self {
            head: Arc::clone(&self.head),
            step: self.step.clone(),
        }
    }
}

impl<T> fmt::Debug for Process<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("constant", &matches!(self.step, Step::Constant))
            .finish_non_exhaustive()
    }
}

impl<T: Send + Sync + 'static> Process<T> {
    /// 이미 계산된 값과 전이 함수로 노드를 생성합니다.
    pub fn new<F>(value: T, evolve: F) -> Self
    where
        F: Fn() -> Process<T> + Send + Sync + 'static,
    {
        Self {
            head: Arc::new(Head::Ready(value)),
            step: Step::Evolve(Arc::new(evolve)),
        }
    }

    /// 값을 처음 읽을 때 계산하는 노드를 생성합니다.
    pub fn deferred<V, F>(value: V, evolve: F) -> Self
    where
        V: Fn() -> T + Send + Sync + 'static,
        F: Fn() -> Process<T> + Send + Sync + 'static,
    {
        Self {
            head: Arc::new(Head::Deferred {
                cell: OnceLock::new(),
                thunk: Box::new(value),
            }),
            step: Step::Evolve(Arc::new(evolve)),
        }
    }

    /// 항상 같은 값을 내는 무한 프로세스를 생성합니다.
    pub fn constant(value: T) -> Self {
        Self {
            head: Arc::new(Head::Ready(value)),
            step: Step::Constant,
        }
    }

    fn deferred_constant<V>(value: V) -> Self
    where
        V: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            head: Arc::new(Head::Deferred {
                cell: OnceLock::new(),
                thunk: Box::new(value),
            }),
            step: Step::Constant,
        }
    }

    /// 현재 값을 반환합니다.
    pub fn value(&self) -> &T {
        self.head.get()
    }

    /// 상수 프로세스인지 확인합니다.
    pub fn is_constant(&self) -> bool {
        matches!(self.step, Step::Constant)
    }

    /// 다음 노드를 반환합니다. 현재 노드는 변경되지 않습니다.
    pub fn evolve(&self) -> Process<T> {
        match &self.step {
            Step::Constant => self.clone(),
            Step::Evolve(next) => next(),
        }
    }

    /// `n`번 진행한 노드를 반환합니다.
    pub fn skip(&self, n: usize) -> Process<T> {
        let mut current = self.clone();
        for _ in 0..n {
            current = current.evolve();
        }
        current
    }

    /// 현재 노드부터 시작하는 (끝나지 않는) 반복자를 반환합니다.
    pub fn iter(&self) -> ProcessIter<T> {
        ProcessIter {
            current: self.clone(),
            started: false,
        }
    }

    /// 처음 `n`개의 값을 순서대로 구체화합니다.
    ///
    /// 원본 프로세스는 영속적이므로 여러 번 호출해도 같은 결과를 얻습니다.
    pub fn take(&self, n: usize) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().take(n).collect()
    }

    /// 각 값에 `f`를 적용한 프로세스를 반환합니다.
    ///
    /// 변환은 노드의 값을 읽을 때 계산됩니다.
    pub fn map<R, F>(&self, f: F) -> Process<R>
    where
        R: Send + Sync + 'static,
        F: Fn(&T) -> R + Send + Sync + 'static,
    {
        map_node(self.clone(), Arc::new(f))
    }

    /// 두 프로세스를 같은 보폭으로 묶습니다.
    pub fn zip<U>(&self, other: &Process<U>) -> Process<(T, U)>
    where
        T: Clone,
        U: Clone + Send + Sync + 'static,
    {
        let (left, right) = (self.clone(), other.clone());
        let (head_left, head_right) = (self.clone(), other.clone());
        Process::deferred(
            move || (head_left.value().clone(), head_right.value().clone()),
            move || left.evolve().zip(&right.evolve()),
        )
    }

    /// 같은 타입의 프로세스 목록을 값 목록의 프로세스로 묶습니다.
    pub fn sequence(processes: Vec<Process<T>>) -> Process<Vec<T>>
    where
        T: Clone,
    {
        let members: Arc<[Process<T>]> = processes.into();
        let head_members = Arc::clone(&members);
        Process::deferred(
            move || head_members.iter().map(|p| p.value().clone()).collect(),
            move || Process::sequence(members.iter().map(Process::evolve).collect()),
        )
    }

    /// 명시적 상태를 가진 프로세스 (stateful fold).
    ///
    /// 각 단계에서 *현재* 상태를 내보내고, `f(상태, 입력의 현재 값)`으로 다음
    /// 상태로 전이합니다. 자기 이전 상태에 의존하는 마르코프 진화를 변경 없이
    /// 표현하는 방법입니다.
    pub fn fold<A, F>(initial: T, input: &Process<A>, f: F) -> Process<T>
    where
        A: Send + Sync + 'static,
        F: Fn(&T, &A) -> T + Send + Sync + 'static,
    {
        fold_node(initial, input.clone(), Arc::new(f))
    }

    /// 입력 없이 상태만으로 진화하는 프로세스.
    pub fn unfold<F>(initial: T, f: F) -> Process<T>
    where
        F: Fn(&T) -> T + Send + Sync + 'static,
    {
        Process::fold(initial, &Process::constant(()), move |state, _| f(state))
    }

    /// `frequency`개씩 묶은 구간을 `reducer`로 축약하는 프로세스 (누적 의미).
    ///
    /// `reducer`는 생성 시점에는 호출되지 않으며, 결과 노드의 값을 읽을 때 노드당
    /// 최대 한 번 호출됩니다.
    ///
    /// # Errors
    ///
    /// `frequency`가 0이면 [`EsgError::InvalidArgument`]를 반환합니다.
    pub fn aggregate<F>(&self, frequency: usize, reducer: F) -> EsgResult<Process<T>>
    where
        T: Clone,
        F: Fn(&[T]) -> T + Send + Sync + 'static,
    {
        if frequency == 0 {
            return Err(EsgError::invalid_argument(format!(
                "need positive frequency to sample, got {}",
                frequency
            )));
        }
        Ok(aggregate_node(self.clone(), frequency, Arc::new(reducer)))
    }

    /// `frequency`개씩 건너뛰며 구간의 마지막 값만 내보내는 프로세스 (스냅샷 의미).
    ///
    /// # Errors
    ///
    /// `frequency`가 0이면 [`EsgError::InvalidArgument`]를 반환합니다.
    pub fn sample(&self, frequency: usize) -> EsgResult<Process<T>>
    where
        T: Clone,
    {
        self.aggregate(frequency, |window: &[T]| window[window.len() - 1].clone())
    }
}

fn map_node<T, R, F>(source: Process<T>, f: Arc<F>) -> Process<R>
where
    T: Send + Sync + 'static,
    R: Send + Sync + 'static,
    F: Fn(&T) -> R + Send + Sync + 'static,
{
    let head_source = source.clone();
    let head_f = Arc::clone(&f);
    let value = move || head_f(head_source.value());

    if source.is_constant() {
        return Process::deferred_constant(value);
    }
    Process::deferred(value, move || map_node(source.evolve(), Arc::clone(&f)))
}

fn fold_node<S, A, F>(state: S, input: Process<A>, f: Arc<F>) -> Process<S>
where
    S: Send + Sync + 'static,
    A: Send + Sync + 'static,
    F: Fn(&S, &A) -> S + Send + Sync + 'static,
{
    let head = Arc::new(Head::Ready(state));
    let current = Arc::clone(&head);
    let next: Evolve<S> = Arc::new(move || {
        let next_state = f(current.get(), input.value());
        fold_node(next_state, input.evolve(), Arc::clone(&f))
    });
    Process {
        head,
        step: Step::Evolve(next),
    }
}

fn aggregate_node<T, F>(source: Process<T>, frequency: usize, reducer: Arc<F>) -> Process<T>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(&[T]) -> T + Send + Sync + 'static,
{
    let window = Arc::new(LazyWindow::new(source, frequency));
    let head_window = Arc::clone(&window);
    let head_reducer = Arc::clone(&reducer);
    Process::deferred(
        move || head_reducer(head_window.values()),
        move || aggregate_node(window.rest().clone(), frequency, Arc::clone(&reducer)),
    )
}

/// 1씩 증가하는 카운터 프로세스.
pub fn count(start: i64) -> Process<i64> {
    Process::fold(start, &Process::constant(1), |n, step| n + step)
}

/// [`Process`]의 반복자 뷰. 프로세스는 무한하므로 `None`을 반환하지 않습니다.
pub struct ProcessIter<T> {
    current: Process<T>,
    started: bool,
}

impl<T: Clone + Send + Sync + 'static> Iterator for ProcessIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        // 마지막으로 내보낸 노드는 필요할 때만 진행시킨다
        if self.started {
            self.current = self.current.evolve();
        } else {
            self.started = true;
        }
        Some(self.current.value().clone())
    }
}
