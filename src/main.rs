#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_stm32::can::{Can, Rx0InterruptHandler, Rx1InterruptHandler, SceInterruptHandler, TxInterruptHandler};
use embassy_stm32::{bind_interrupts, peripherals};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use adc_monitor::board::Board;
use adc_monitor::config::{AcquisitionConfig, HEARTBEAT_PERIOD, LED_HOLD_PERIOD};
use adc_monitor::drivers::can_link::CanLink;
use adc_monitor::drivers::exti_button::ExtiButton;
use adc_monitor::drivers::status_led::StatusLed;
use adc_monitor::drivers::stm32_adc::Stm32Adc;
use adc_monitor::report::{QueueSink, ReportQueue, ReportSink, INIT_OK_LINE};
use adc_monitor::state::CommandCode;
use adc_monitor::tasks::acquisition::AcquisitionTask;
use adc_monitor::tasks::button::ButtonIrq;
use adc_monitor::tasks::command::{run_receiver, run_sender, CommandDispatcher};
use adc_monitor::tasks::hold_timer::HoldTimer;
use adc_monitor::tasks::link::LinkConsumer;
use adc_monitor::{usb, CompletionSignal, DistributionQueue, Fault, Measurement, SharedActuator};

type Led = SharedActuator<StatusLed>;

// ── Interrupt ⇄ task state ────────────────────────────────────────────────────
static COMPLETION: CompletionSignal = CompletionSignal::new();
static HOLD_TIMER: HoldTimer = HoldTimer::new(LED_HOLD_PERIOD);

// ── Inter-task queues ─────────────────────────────────────────────────────────
//  Cap=1: a full queue drops the new item, producers never wait.
static MEASUREMENTS: DistributionQueue<Measurement> = DistributionQueue::new();
static COMMANDS: DistributionQueue<CommandCode> = DistributionQueue::new();
static REPORTS: ReportQueue = ReportQueue::new();

static LED: StaticCell<Led> = StaticCell::new();

// ── Interrupt bindings ────────────────────────────────────────────────────────
bind_interrupts!(struct Irqs {
    CAN1_RX0 => Rx0InterruptHandler<peripherals::CAN1>;
    CAN1_RX1 => Rx1InterruptHandler<peripherals::CAN1>;
    CAN1_SCE => SceInterruptHandler<peripherals::CAN1>;
    CAN1_TX  => TxInterruptHandler<peripherals::CAN1>;
});

fn halt(task: &str, fault: Fault) -> ! {
    defmt::error!("{}: fatal {}", task, fault);
    defmt::panic!("halted on fault");
}

// ── Tasks ─────────────────────────────────────────────────────────────────────
#[embassy_executor::task]
async fn acquisition_task(mut task: AcquisitionTask<'static, Stm32Adc<'static>, QueueSink<'static>>) {
    match task.run(&MEASUREMENTS).await {
        Ok(never) => match never {},
        Err(fault) => halt("acquisition", fault),
    }
}

#[embassy_executor::task]
async fn hold_timer_task(led: &'static Led) {
    match HOLD_TIMER.service(led).await {}
}

#[embassy_executor::task]
async fn button_task(led: &'static Led, button: ExtiButton) {
    let mut irq = ButtonIrq::new(led, &HOLD_TIMER);
    match irq.run(button).await {
        Ok(never) => match never {},
        Err(fault) => halt("button", fault),
    }
}

#[embassy_executor::task]
async fn receive_task(led: &'static Led) {
    let mut dispatcher = CommandDispatcher::new();
    match run_receiver(&COMMANDS, led, &mut dispatcher).await {}
}

#[embassy_executor::task]
async fn link_task(link: CanLink) {
    let mut consumer = LinkConsumer::new(link);
    match consumer.run(&MEASUREMENTS).await {}
}

// ── Main ──────────────────────────────────────────────────────────────────────
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // 1. Board init (168 MHz PLL), peripherals split by role
    let board = Board::init();

    // 2. USB CDC-ACM report channel
    let (usb_dev, usb_serial) = usb::init(board.usb.otg, board.usb.dp, board.usb.dm);
    defmt::unwrap!(spawner.spawn(usb::usb_task(usb_dev)));
    defmt::unwrap!(spawner.spawn(usb::report_task(usb_serial, &REPORTS)));

    // 3. Status LED (PC13, active low) shared by button, timer and receiver
    let led: &'static Led = LED.init(SharedActuator::new(StatusLed::new(board.led, true)));

    // 4. Acquisition: ADC1 on PC0, group 0
    let config = AcquisitionConfig::default();
    let adc = Stm32Adc::new(
        board.analog.adc,
        board.analog.pin,
        adc_monitor::config::ADC_RESOLUTION,
        &COMPLETION,
    );
    let acquisition = match AcquisitionTask::new(adc, &COMPLETION, QueueSink::new(&REPORTS), config) {
        Ok(task) => task,
        Err(fault) => halt("init", fault),
    };

    // 5. CAN1 @ 500 kbit/s (RX=PB8, TX=PB9)
    let can = Can::new(board.can.can, board.can.rx, board.can.tx, Irqs);
    let Some(link) = CanLink::new(can).await else {
        defmt::panic!("can: invalid measurement id");
    };

    // 6. Button on PA0 / EXTI0
    let button = ExtiButton::new(board.button.pin, board.button.line);

    QueueSink::new(&REPORTS).emit(INIT_OK_LINE);
    defmt::info!("init OK");

    // 7. Spawn all tasks
    defmt::unwrap!(spawner.spawn(hold_timer_task(led)));
    defmt::unwrap!(spawner.spawn(button_task(led, button)));
    defmt::unwrap!(spawner.spawn(receive_task(led)));
    defmt::unwrap!(spawner.spawn(link_task(link)));
    defmt::unwrap!(spawner.spawn(acquisition_task(acquisition)));

    // 8. Main task: heartbeat sender
    match run_sender(&COMMANDS, HEARTBEAT_PERIOD).await {}
}
