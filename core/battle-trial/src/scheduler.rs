//! 延遲步驟佇列
//!
//! 以虛擬時鐘取代計時器：步驟排入時記錄到期時間，由呼叫端推進時間才會執行。
//! 到期時間相同的步驟依排入順序執行。

use crate::alias::Millis;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug)]
struct Entry<T> {
    due: Millis,
    seq: u64,
    step: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        (self.due, self.seq) == (other.due, other.seq)
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

#[derive(Debug)]
pub struct Scheduler<T> {
    now: Millis,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Entry<T>>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 目前的虛擬時間
    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// 下一個步驟的到期時間
    pub fn next_due(&self) -> Option<Millis> {
        self.queue.peek().map(|Reverse(entry)| entry.due)
    }

    /// 排入一個在 `delay` 毫秒後到期的步驟
    pub fn schedule(&mut self, delay: Millis, step: T) -> Millis {
        let due = self.now.saturating_add(delay);
        self.queue.push(Reverse(Entry {
            due,
            seq: self.next_seq,
            step,
        }));
        self.next_seq += 1;
        due
    }

    /// 取出最早到期且不晚於 `deadline` 的步驟，時鐘推進到該步驟的到期時間
    pub fn pop_due(&mut self, deadline: Millis) -> Option<T> {
        if self.next_due()? > deadline {
            return None;
        }
        self.pop_next()
    }

    /// 不論時間，取出最早到期的步驟
    pub fn pop_next(&mut self) -> Option<T> {
        let Reverse(entry) = self.queue.pop()?;
        self.now = self.now.max(entry.due);
        Some(entry.step)
    }

    /// 時鐘推進到 `time`（不會倒退）
    pub fn advance_to(&mut self, time: Millis) {
        self.now = self.now.max(time);
    }

    /// 丟棄所有尚未執行的步驟
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
