use adc_monitor::config::RESULT_WINDOW_CAPACITY;
use adc_monitor::drivers::adc::reduce_window;
use adc_monitor::Fault;
use proptest::prelude::*;

/// A window plus a `(start, num_channels)` range that fits inside it.
fn window_with_range() -> impl Strategy<Value = (Vec<u16>, usize, usize)> {
    prop::collection::vec(any::<u16>(), 1..=RESULT_WINDOW_CAPACITY)
        .prop_flat_map(|w| {
            let len = w.len();
            (Just(w), 0..len)
        })
        .prop_flat_map(|(w, start)| {
            let len = w.len();
            (Just(w), Just(start), 1..=len - start)
        })
}

proptest! {
    #[test]
    fn matching_window_gives_floor_average((window, start, n) in window_with_range()) {
        let last = start + n - 1;
        let sum: u32 = window[start..=last].iter().map(|&s| u32::from(s)).sum();

        prop_assert_eq!(reduce_window(&window, start, last, n), Ok(sum / n as u32));
    }

    #[test]
    fn mismatched_window_never_yields_an_average(
        window in prop::collection::vec(any::<u16>(), RESULT_WINDOW_CAPACITY),
        start in 0..RESULT_WINDOW_CAPACITY,
        last in 0..2 * RESULT_WINDOW_CAPACITY,
        n in 1..=RESULT_WINDOW_CAPACITY,
    ) {
        let actual = last.checked_sub(start).map_or(0, |d| d + 1);
        prop_assume!(actual != n);

        let res = reduce_window(&window, start, last, n);
        prop_assert_eq!(res, Err(Fault::WindowMismatch { expected: n, actual }));
    }
}

#[test]
fn two_channel_average_truncates() {
    assert_eq!(reduce_window(&[10, 11], 0, 1, 2), Ok(10));
}
