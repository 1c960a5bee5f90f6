//! Queue estimator tests

use fuzzy_traffic::simulation::{Lane, QueueEstimator, QueueSamples, SimConfig};

#[test]
fn test_empty_buffer_averages_to_zero() {
    let samples = QueueSamples::new(30);
    assert!(samples.is_empty());
    assert_eq!(samples.mean(), 0.0);

    let estimator = QueueEstimator::new(30);
    for lane in Lane::ALL {
        assert_eq!(estimator.moving_average(lane), 0.0);
    }
}

#[test]
fn test_mean_of_partial_buffer() {
    let mut samples = QueueSamples::new(30);
    samples.push(2);
    samples.push(4);
    samples.push(9);
    assert_eq!(samples.len(), 3);
    assert_eq!(samples.mean(), 5.0);
}

#[test]
fn test_full_buffer_evicts_oldest() {
    let mut samples = QueueSamples::new(30);
    for count in 0..30 {
        samples.push(count);
    }
    assert_eq!(samples.len(), 30);
    assert_eq!(samples.iter().next(), Some(0));

    samples.push(30);
    assert_eq!(samples.len(), 30);
    assert_eq!(samples.iter().next(), Some(1));
    assert_eq!(samples.iter().last(), Some(30));
    // 1..=30
    assert_eq!(samples.mean(), 15.5);
}

#[test]
fn test_window_slides_over_old_values() {
    let mut samples = QueueSamples::new(4);
    for _ in 0..4 {
        samples.push(8);
    }
    assert_eq!(samples.mean(), 8.0);
    for _ in 0..4 {
        samples.push(0);
    }
    assert_eq!(samples.mean(), 0.0);
    assert_eq!(samples.capacity(), 4);
}

#[test]
fn test_zero_capacity_keeps_one_sample() {
    let mut samples = QueueSamples::new(0);
    samples.push(3);
    samples.push(7);
    assert_eq!(samples.len(), 1);
    assert_eq!(samples.mean(), 7.0);
}

#[test]
fn test_lanes_are_independent() {
    let mut estimator = QueueEstimator::new(SimConfig::default().simulator.sample_capacity());
    estimator.record(Lane::LeftToRight, 6);
    estimator.record(Lane::LeftToRight, 2);
    estimator.record(Lane::TopToBottom, 1);

    assert_eq!(estimator.moving_average(Lane::LeftToRight), 4.0);
    assert_eq!(estimator.moving_average(Lane::TopToBottom), 1.0);
    assert_eq!(estimator.moving_average(Lane::RightToLeft), 0.0);
    assert_eq!(estimator.samples(Lane::LeftToRight).capacity(), 30);
}
