/*
 * Copyright (c) 2021 Works Applications Co., Ltd.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::collections::VecDeque;

/// Last `n` items of an iterator, in order.
pub fn tail<T, I: Iterator<Item = T>>(n: usize, iter: I) -> Vec<T> {
    let mut buf = VecDeque::with_capacity(n + 1);
    for item in iter {
        buf.push_back(item);
        if buf.len() > n {
            buf.pop_front();
        }
    }
    buf.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_keeps_last_items() {
        assert_eq!(tail(3, 0..10), vec![7, 8, 9]);
        assert_eq!(tail(5, 0..3), vec![0, 1, 2]);
        assert_eq!(tail(1, std::iter::empty::<i32>()), Vec::<i32>::new());
    }
}
