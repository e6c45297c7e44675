use adc_monitor::completion::{CompletionSignal, GroupCompletion};
use adc_monitor::config::{AcquisitionConfig, GroupId};
use adc_monitor::drivers::adc::StartStatus;
use adc_monitor::drivers::sim::SimulatedAdc;
use adc_monitor::report::ReportSink;
use adc_monitor::tasks::acquisition::AcquisitionTask;
use adc_monitor::{DistributionQueue, Fault, Measurement};
use embassy_time::{with_timeout, Duration};

#[derive(Default)]
struct Lines(Vec<String>);

impl ReportSink for Lines {
    fn emit(&mut self, line: &str) {
        self.0.push(line.to_owned());
    }
}

const WINDOW: [u16; 4] = [100, 102, 98, 100];

fn fast_config() -> AcquisitionConfig {
    AcquisitionConfig {
        period: Duration::from_millis(20),
        inter_group_delay: Duration::from_millis(1),
        ..Default::default()
    }
}

#[tokio::test]
async fn window_is_reduced_scaled_and_reported() {
    let completion = CompletionSignal::new();
    let adc = SimulatedAdc::new(&completion, &WINDOW);
    let mut task = AcquisitionTask::new(adc, &completion, Lines::default(), fast_config()).unwrap();

    let m = task.run_period().await.unwrap().unwrap();

    assert_eq!(m.raw_average, 100);
    assert!((m.volts - 0.122_07).abs() < 1e-5);

    let lines = &task.sink().0;
    assert_eq!(lines.len(), 4);
    assert!(lines.iter().all(|l| l == "ADC result: 0.12207 V\r\n"));

    // One start per iteration plus the trailing restart, then one stop.
    assert_eq!(task.driver().starts(), 5);
    assert_eq!(task.driver().stops(), 1);
}

#[tokio::test]
async fn stale_completion_from_previous_period_is_ignored() {
    let completion = CompletionSignal::new();
    completion.complete(GroupCompletion { group: GroupId(0), last_offset: 9 });

    let adc = SimulatedAdc::new(&completion, &WINDOW);
    let mut task = AcquisitionTask::new(adc, &completion, Lines::default(), fast_config()).unwrap();

    assert!(task.run_period().await.is_ok());
}

#[tokio::test]
async fn wrong_window_length_halts() {
    let completion = CompletionSignal::new();
    let adc = SimulatedAdc::new(&completion, &WINDOW).with_last_offset(2);
    let mut task = AcquisitionTask::new(adc, &completion, Lines::default(), fast_config()).unwrap();

    assert_eq!(
        task.run_period().await,
        Err(Fault::WindowMismatch { expected: 4, actual: 3 })
    );
    assert!(task.sink().0.is_empty());
}

#[tokio::test]
async fn rejected_first_start_halts_before_any_report() {
    let completion = CompletionSignal::new();
    let adc = SimulatedAdc::new(&completion, &WINDOW).reject_after(0, StartStatus::Error);
    let mut task = AcquisitionTask::new(adc, &completion, Lines::default(), fast_config()).unwrap();

    assert_eq!(
        task.run_period().await,
        Err(Fault::StartRejected { group: GroupId(0), status: StartStatus::Error })
    );
    assert!(task.sink().0.is_empty());
}

#[tokio::test]
async fn busy_restart_halts_mid_period() {
    let completion = CompletionSignal::new();
    let adc = SimulatedAdc::new(&completion, &WINDOW).reject_after(2, StartStatus::Busy);
    let mut task = AcquisitionTask::new(adc, &completion, Lines::default(), fast_config()).unwrap();

    assert_eq!(
        task.run_period().await,
        Err(Fault::StartRejected { group: GroupId(0), status: StartStatus::Busy })
    );
    assert_eq!(task.sink().0.len(), 2);
}

#[tokio::test]
async fn failed_stop_halts() {
    let completion = CompletionSignal::new();
    let adc = SimulatedAdc::new(&completion, &WINDOW).failing_stop();
    let mut task = AcquisitionTask::new(adc, &completion, Lines::default(), fast_config()).unwrap();

    assert_eq!(task.run_period().await, Err(Fault::StopFailed { group: GroupId(0) }));
    assert_eq!(task.sink().0.len(), 4);
}

#[tokio::test]
async fn silent_converter_stalls_without_timeout() {
    let completion = CompletionSignal::new();
    let adc = SimulatedAdc::new(&completion, &WINDOW).silent();
    let mut task = AcquisitionTask::new(adc, &completion, Lines::default(), fast_config()).unwrap();

    assert!(with_timeout(Duration::from_millis(50), task.run_period()).await.is_err());
}

#[tokio::test]
async fn silent_converter_times_out_when_bounded() {
    let completion = CompletionSignal::new();
    let adc = SimulatedAdc::new(&completion, &WINDOW).silent();
    let config = AcquisitionConfig {
        completion_timeout: Some(Duration::from_millis(10)),
        ..fast_config()
    };
    let mut task = AcquisitionTask::new(adc, &completion, Lines::default(), config).unwrap();

    assert_eq!(
        task.run_period().await,
        Err(Fault::CompletionTimeout { group: GroupId(0) })
    );
}

#[tokio::test]
async fn invalid_config_is_refused_up_front() {
    let completion = CompletionSignal::new();
    let adc = SimulatedAdc::new(&completion, &WINDOW);
    let config = AcquisitionConfig { iterations: 0, ..fast_config() };

    let res = AcquisitionTask::new(adc, &completion, Lines::default(), config);
    assert!(matches!(res, Err(Fault::InvalidConfig(_))));
}

#[tokio::test]
async fn unconsumed_measurement_makes_later_ones_drop() {
    let completion = CompletionSignal::new();
    let queue: DistributionQueue<Measurement> = DistributionQueue::new();
    let adc = SimulatedAdc::new(&completion, &WINDOW);
    let mut task = AcquisitionTask::new(adc, &completion, Lines::default(), fast_config()).unwrap();

    // Nobody drains the queue: the first publish fills it, the rest drop.
    assert!(with_timeout(Duration::from_millis(300), task.run(&queue)).await.is_err());

    let m = queue.try_receive().unwrap();
    assert_eq!(m.raw_average, 100);
    assert!(queue.dropped() >= 1);
    assert!(queue.try_receive().is_none());
}
