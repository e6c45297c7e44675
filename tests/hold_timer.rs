use adc_monitor::actuator::RecordingActuator;
use adc_monitor::drivers::adc::DriverError;
use adc_monitor::tasks::button::{ButtonIrq, EdgeSource};
use adc_monitor::tasks::hold_timer::HoldTimer;
use adc_monitor::{DistributionQueue, Fault, Level, SharedActuator};
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Timer};

const HOLD: Duration = Duration::from_millis(200);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Edges injected by the test through a queue.
struct QueuedEdges<'a> {
    edges: &'a DistributionQueue<()>,
    fail_enable: bool,
}

impl EdgeSource for QueuedEdges<'_> {
    fn enable(&mut self) -> Result<(), DriverError> {
        if self.fail_enable {
            Err(DriverError::Hardware)
        } else {
            Ok(())
        }
    }

    async fn wait_for_edge(&mut self) {
        self.edges.receive().await;
    }

    fn clear_pending(&mut self) {}
}

#[tokio::test]
async fn single_reset_expires_exactly_once_and_not_early() {
    let led = SharedActuator::new(RecordingActuator::default());
    let timer = HoldTimer::new(HOLD);

    let scenario = async {
        led.set(Level::On);
        timer.reset_from_isr();

        Timer::after(ms(50)).await;
        assert_eq!(timer.expirations(), 0);
        assert_eq!(led.level(), Level::On);

        Timer::after(ms(400)).await;
        assert_eq!(timer.expirations(), 1);
        assert_eq!(led.level(), Level::Off);
        assert!(!timer.is_armed());

        Timer::after(ms(400)).await;
        assert_eq!(timer.expirations(), 1);
    };

    match select(timer.service(&led), scenario).await {
        Either::First(never) => match never {},
        Either::Second(()) => {}
    }
}

#[tokio::test]
async fn reset_before_expiry_restarts_the_full_period() {
    let led = SharedActuator::new(RecordingActuator::default());
    let timer = HoldTimer::new(HOLD);

    let scenario = async {
        timer.reset_from_isr();
        Timer::after(ms(120)).await;
        timer.reset_from_isr();
        Timer::after(ms(120)).await;

        // Past the first deadline, inside the second one.
        assert_eq!(timer.expirations(), 0);

        Timer::after(ms(400)).await;
        assert_eq!(timer.expirations(), 1);
    };

    match select(timer.service(&led), scenario).await {
        Either::First(never) => match never {},
        Either::Second(()) => {}
    }
}

#[tokio::test]
async fn late_service_poll_still_honours_reset_before_deadline() {
    let led = SharedActuator::new(RecordingActuator::default());
    let timer = HoldTimer::new(HOLD);

    let scenario = async {
        led.set(Level::On);
        timer.reset_from_isr();
        Timer::after(ms(190)).await;

        // Reset 10 ms before the deadline, then keep the executor busy past
        // it so the service sees the timer and the rearm ready together.
        led.set(Level::On);
        timer.reset_from_isr();
        std::thread::sleep(std::time::Duration::from_millis(30));
        Timer::after(ms(50)).await;

        assert_eq!(timer.expirations(), 0);
        assert_eq!(led.level(), Level::On);

        Timer::after(ms(400)).await;
        assert_eq!(timer.expirations(), 1);
        assert_eq!(led.level(), Level::Off);
    };

    match select(timer.service(&led), scenario).await {
        Either::First(never) => match never {},
        Either::Second(()) => {}
    }
}

#[tokio::test]
async fn button_press_holds_led_on_until_quiet() {
    let led = SharedActuator::new(RecordingActuator::default());
    let timer = HoldTimer::new(HOLD);
    let edges: DistributionQueue<()> = DistributionQueue::new();
    let mut irq = ButtonIrq::new(&led, &timer);

    let scenario = async {
        assert!(edges.try_publish(()));
        Timer::after(ms(50)).await;
        assert_eq!(led.level(), Level::On);

        Timer::after(ms(400)).await;
        assert_eq!(led.level(), Level::Off);
        assert_eq!(timer.expirations(), 1);
    };

    let source = QueuedEdges { edges: &edges, fail_enable: false };
    let tasks = select(timer.service(&led), irq.run(source));

    match select(tasks, scenario).await {
        Either::First(Either::First(never)) => match never {},
        Either::First(Either::Second(res)) => panic!("button task ended: {:?}", res),
        Either::Second(()) => {}
    }

    assert_eq!(irq.edges(), 1);
    led.inspect(|a| assert_eq!(a.history.as_slice(), &[Level::On, Level::Off]));
}

#[tokio::test]
async fn edge_pending_at_arming_is_serviced_not_fatal() {
    let led = SharedActuator::new(RecordingActuator::default());
    let timer = HoldTimer::new(HOLD);
    let edges: DistributionQueue<()> = DistributionQueue::new();
    let mut irq = ButtonIrq::new(&led, &timer);

    // Button already down when the handler starts.
    assert!(edges.try_publish(()));

    let source = QueuedEdges { edges: &edges, fail_enable: false };
    match select(irq.run(source), Timer::after(ms(50))).await {
        Either::First(res) => panic!("button task ended: {:?}", res),
        Either::Second(()) => {}
    }

    assert_eq!(irq.edges(), 1);
    assert_eq!(led.level(), Level::On);
    assert!(timer.is_armed());
}

#[tokio::test]
async fn failed_interrupt_setup_is_fatal() {
    let led = SharedActuator::new(RecordingActuator::default());
    let timer = HoldTimer::new(HOLD);
    let edges: DistributionQueue<()> = DistributionQueue::new();
    let mut irq = ButtonIrq::new(&led, &timer);

    let res = irq.run(QueuedEdges { edges: &edges, fail_enable: true }).await;

    assert_eq!(res.err(), Some(Fault::InterruptSetup));
    assert_eq!(led.writes(), 0);
}
