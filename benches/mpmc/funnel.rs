//! # Funnel — Multi-Source Event Loop
//!
//! **Real-world scenario**: one consumer drains several producers through a
//! select, like an event loop watching a command queue and a data queue.
//!
//! ```text
//! ┌──────────┐
//! │ Source A │ ──┐
//! └──────────┘   ├──► select ──► Consumer
//! ┌──────────┐   │
//! │ Source B │ ──┘
//! └──────────┘
//! ```
//!
//! The interesting cost is the select machinery itself: locking both
//! channels in canonical order, scanning, and (when both sources lag)
//! registering and parking. Compared against the select offered by
//! crossbeam-channel and flume.

use crossbeam_channel::bounded as crossbeam_bounded;
use crossbeam_channel::select;
use crossbeam_utils::thread::scope;
use staffetta::mpmc::{self, SelectOp};
use test::Bencher;

const BUFFER_SIZE: usize = 1024;
const MESSAGES_PER_SOURCE: usize = 10_000;

#[bench]
fn staffetta_select(b: &mut Bencher) {
    let a = mpmc::bounded::<i32>(BUFFER_SIZE);
    let c = mpmc::bounded::<i32>(BUFFER_SIZE);

    let (start_tx_a, start_rx_a) = crossbeam_bounded(0);
    let (start_tx_c, start_rx_c) = crossbeam_bounded(0);

    scope(|s| {
        s.spawn(|_| {
            while start_rx_a.recv().is_ok() {
                for i in 0..MESSAGES_PER_SOURCE {
                    a.send(i as i32).unwrap();
                }
            }
        });
        s.spawn(|_| {
            while start_rx_c.recv().is_ok() {
                for i in 0..MESSAGES_PER_SOURCE {
                    c.send(i as i32).unwrap();
                }
            }
        });

        b.iter(|| {
            start_tx_a.send(()).unwrap();
            start_tx_c.send(()).unwrap();
            for _ in 0..2 * MESSAGES_PER_SOURCE {
                let mut ops = [SelectOp::recv(&a), SelectOp::recv(&c)];
                let i = mpmc::select(&mut ops).unwrap();
                test::black_box(ops[i].take_received().unwrap());
            }
        });

        drop(start_tx_a);
        drop(start_tx_c);
    })
    .unwrap();
}

#[bench]
fn crossbeam_select(b: &mut Bencher) {
    let (tx_a, rx_a) = crossbeam_bounded::<i32>(BUFFER_SIZE);
    let (tx_c, rx_c) = crossbeam_bounded::<i32>(BUFFER_SIZE);

    let (start_tx_a, start_rx_a) = crossbeam_bounded(0);
    let (start_tx_c, start_rx_c) = crossbeam_bounded(0);

    scope(|s| {
        s.spawn(|_| {
            while start_rx_a.recv().is_ok() {
                for i in 0..MESSAGES_PER_SOURCE {
                    tx_a.send(i as i32).unwrap();
                }
            }
        });
        s.spawn(|_| {
            while start_rx_c.recv().is_ok() {
                for i in 0..MESSAGES_PER_SOURCE {
                    tx_c.send(i as i32).unwrap();
                }
            }
        });

        b.iter(|| {
            start_tx_a.send(()).unwrap();
            start_tx_c.send(()).unwrap();
            for _ in 0..2 * MESSAGES_PER_SOURCE {
                select! {
                    recv(rx_a) -> v => { test::black_box(v.unwrap()); }
                    recv(rx_c) -> v => { test::black_box(v.unwrap()); }
                }
            }
        });

        drop(start_tx_a);
        drop(start_tx_c);
    })
    .unwrap();
}

#[bench]
fn flume_select(b: &mut Bencher) {
    let (tx_a, rx_a) = flume::bounded::<i32>(BUFFER_SIZE);
    let (tx_c, rx_c) = flume::bounded::<i32>(BUFFER_SIZE);

    let (start_tx_a, start_rx_a) = crossbeam_bounded(0);
    let (start_tx_c, start_rx_c) = crossbeam_bounded(0);

    scope(|s| {
        s.spawn(|_| {
            while start_rx_a.recv().is_ok() {
                for i in 0..MESSAGES_PER_SOURCE {
                    tx_a.send(i as i32).unwrap();
                }
            }
        });
        s.spawn(|_| {
            while start_rx_c.recv().is_ok() {
                for i in 0..MESSAGES_PER_SOURCE {
                    tx_c.send(i as i32).unwrap();
                }
            }
        });

        b.iter(|| {
            start_tx_a.send(()).unwrap();
            start_tx_c.send(()).unwrap();
            for _ in 0..2 * MESSAGES_PER_SOURCE {
                let v = flume::Selector::new()
                    .recv(&rx_a, |v| v.unwrap())
                    .recv(&rx_c, |v| v.unwrap())
                    .wait();
                test::black_box(v);
            }
        });

        drop(start_tx_a);
        drop(start_tx_c);
    })
    .unwrap();
}
