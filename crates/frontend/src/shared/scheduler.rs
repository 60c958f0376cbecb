use std::cell::RefCell;
use std::collections::VecDeque;

pub type Task = Box<dyn FnOnce() + 'static>;

/// Откладывает работу до завершения текущего синхронного обработчика
pub trait Scheduler {
    fn defer(&self, task: Task);
}

/// Следующий тик event loop (`setTimeout(0)`).
///
/// Успевают отработать эффекты Leptos и синхронные обновления полей,
/// вызванные тем же DOM-событием.
#[derive(Clone, Copy, Default)]
pub struct NextTick;

impl Scheduler for NextTick {
    fn defer(&self, task: Task) {
        wasm_bindgen_futures::spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(0).await;
            task();
        });
    }
}

/// Очередь, которую прокручивают вручную. Для тестов.
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<VecDeque<Task>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Выполняет задачи по порядку, включая поставленные во время выполнения.
    /// Возвращает количество выполненных.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            // borrow отпускается до вызова: задача может поставить новую
            let next = self.queue.borrow_mut().pop_front();
            let Some(task) = next else {
                return ran;
            };
            task();
            ran += 1;
        }
    }
}

impl Scheduler for ManualScheduler {
    fn defer(&self, task: Task) {
        self.queue.borrow_mut().push_back(task);
    }
}
