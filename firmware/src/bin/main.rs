#![no_std]
#![no_main]

use defmt::{error, info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART1;
use embassy_rp::uart::{Async, Config as UartConfig, Uart, UartRx, UartTx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use ozone_monitor_rp2040::{
    Command, RxConsumer, RxProducer, RxRing, SensorPipeline, SensorReading, RX_BUFFER_SIZE,
    SENSOR_BAUD, TICK_INTERVAL_MS,
};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    UART1_IRQ => embassy_rp::uart::InterruptHandler<UART1>;
});

/// Signal carrying the latest accepted reading from the pipeline task to
/// the report task. Using Signal instead of Channel provides "latest value
/// wins" semantics, which is appropriate here: only the most recent
/// reading matters.
static READING_SIGNAL: StaticCell<Signal<CriticalSectionRawMutex, SensorReading>> =
    StaticCell::new();

/// Receive ring shared between the RX task and the pipeline task.
static RX_RING: StaticCell<RxRing<RX_BUFFER_SIZE>> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("DGS-O3 monitor starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    let signal = READING_SIGNAL.init(Signal::new());
    let ring = RX_RING.init(RxRing::new());
    let (producer, consumer) = ring.split();

    // --- UART Setup ---
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = SENSOR_BAUD;

    let uart = Uart::new(
        p.UART1,
        p.PIN_8, // TX
        p.PIN_9, // RX
        Irqs,
        p.DMA_CH0,
        p.DMA_CH1,
        uart_config,
    );
    let (mut tx, rx) = uart.split();

    // Wake the sensor and switch it to continuous measurement. It does not
    // acknowledge; telemetry simply starts flowing.
    send_command(&mut tx, Command::Wake).await;
    send_command(&mut tx, Command::Continuous).await;

    // On-board LED for error indication
    let led = Output::new(p.PIN_25, Level::Low);

    spawner.spawn(rx_task(rx, producer)).unwrap();
    spawner.spawn(pipeline_task(consumer, signal, led)).unwrap();
    spawner.spawn(report_task(signal)).unwrap();

    info!("DGS-O3 monitor initialized, waiting for telemetry...");
}

/// Write a single-byte command to the sensor.
async fn send_command(tx: &mut UartTx<'static, Async>, command: Command) {
    if let Err(e) = tx.write(&[command.as_byte()]).await {
        error!("failed to send {:?} command: {:?}", command, e);
    }
}

/// RX task - feeds incoming UART bytes into the ring.
///
/// Stands in for the receive interrupt: it only ever touches the producer
/// half, one byte at a time, and never blocks on the pipeline. A full ring
/// drops the byte; the pipeline task reports the loss.
#[embassy_executor::task]
async fn rx_task(mut rx: UartRx<'static, Async>, mut producer: RxProducer<'static, RX_BUFFER_SIZE>) {
    let mut byte = [0u8; 1];
    loop {
        match rx.read(&mut byte).await {
            Ok(()) => {
                producer.push(byte[0]);
            }
            Err(e) => warn!("uart receive error: {:?}", e),
        }
    }
}

/// Pipeline task - ticks the pipeline and publishes accepted readings.
#[embassy_executor::task]
async fn pipeline_task(
    consumer: RxConsumer<'static, RX_BUFFER_SIZE>,
    signal: &'static Signal<CriticalSectionRawMutex, SensorReading>,
    mut led: Output<'static>,
) {
    let mut pipeline = SensorPipeline::new(consumer);
    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));
    let mut accepted = 0;
    let mut errors = 0;

    loop {
        ticker.next().await;
        pipeline.tick();

        let stats = pipeline.stats();
        if stats.frames_accepted != accepted {
            accepted = stats.frames_accepted;
            if let Some(reading) = pipeline.latest_reading() {
                signal.signal(reading);
            }
        }
        if stats.error_total() != errors {
            errors = stats.error_total();
            // Toggle LED to indicate an error condition
            led.toggle();
        }
    }
}

/// Report task - waits for published readings and logs them.
#[embassy_executor::task]
async fn report_task(signal: &'static Signal<CriticalSectionRawMutex, SensorReading>) {
    loop {
        let reading = signal.wait().await;
        info!(
            "O3 {} ppb, {} °C, {} %RH",
            reading.o3_ppb, reading.temperature_c, reading.humidity_pct
        );
    }
}
