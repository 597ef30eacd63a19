//! Multimode Clock Source Main Application
//!
//! Entry point for the RP2040-based clock source firmware.
//! Brings the hardware up and spawns the polling, sampling, and signal
//! tasks.

#![no_std]
#![no_main]

use defmt::info;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc, Channel as AdcChannel};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::uart::{self, Blocking, BufferedUart, BufferedUartRx, BufferedUartTx, UartTx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_time::{Duration, Instant, Ticker};
use embedded_io_async::{Read, Write};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use clockgen_firmware::clock::controller::Controller;
use clockgen_firmware::config::{UART1_BAUD_RATE, UART_BAUD_RATE, UPDATE_INTERVAL_MS};
use clockgen_firmware::hal::adc::pot_sampler_task;
use clockgen_firmware::hal::board::PicoBoard;
use clockgen_firmware::hal::gpio::{Buttons, LedBank, PowerOutput, ResetOutput, StatusLed};
use clockgen_firmware::hal::signal::{signal_task, ClockOutput, SignalChannel};

// Bind interrupt handlers
bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => adc::InterruptHandler;
    UART0_IRQ => uart::BufferedInterruptHandler<UART0>;
});

/// Console bytes queued between the UART reader and the control task
type ByteChannel = Channel<CriticalSectionRawMutex, u8, 64>;
type ByteSender = Sender<'static, CriticalSectionRawMutex, u8, 64>;
type ByteReceiver = Receiver<'static, CriticalSectionRawMutex, u8, 64>;

static SIGNAL_CHANNEL: SignalChannel = SignalChannel::new();
static CONSOLE_BYTES: ByteChannel = ByteChannel::new();
static CONSOLE_TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static CONSOLE_RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Multimode Clock Source v{}", env!("CARGO_PKG_VERSION"));

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // Clock output: GPIO 9 sits on PWM slice 4, channel B. The slice is
    // claimed once and never released; static levels go through it too.
    let pwm = Pwm::new_output_b(p.PWM_SLICE4, p.PIN_9, PwmConfig::default());
    let clock_output = ClockOutput::new(pwm);
    let activity_led = StatusLed::new(Output::new(p.PIN_5, Level::Low));
    spawner
        .spawn(signal_task(
            clock_output,
            activity_led,
            SIGNAL_CHANNEL.receiver(),
        ))
        .unwrap();

    // Potentiometer on ADC0 (GPIO 26)
    let adc_unit = Adc::new(p.ADC, Irqs, adc::Config::default());
    let pot = AdcChannel::new_pin(p.PIN_26, Pull::None);
    spawner.spawn(pot_sampler_task(adc_unit, pot)).unwrap();

    // Console UART (GPIO 0/1)
    let mut console_config = uart::Config::default();
    console_config.baudrate = UART_BAUD_RATE;
    let console = BufferedUart::new(
        p.UART0,
        p.PIN_0,
        p.PIN_1,
        Irqs,
        CONSOLE_TX_BUF.init([0; 256]),
        CONSOLE_RX_BUF.init([0; 64]),
        console_config,
    );
    let (console_rx, console_tx) = console.split();
    spawner
        .spawn(console_reader_task(console_rx, CONSOLE_BYTES.sender()))
        .unwrap();

    // Status mirror UART (GPIO 20, transmit only)
    let mut mirror_config = uart::Config::default();
    mirror_config.baudrate = UART1_BAUD_RATE;
    let mirror_tx = UartTx::new_blocking(p.UART1, p.PIN_20, mirror_config);

    let buttons = Buttons {
        single_step: Input::new(p.PIN_2, Pull::Up),
        low_freq: Input::new(p.PIN_3, Pull::Up),
        high_freq: Input::new(p.PIN_4, Pull::Up),
        reset: Input::new(p.PIN_11, Pull::Up),
        power: Input::new(p.PIN_12, Pull::Up),
    };

    let leds = LedBank {
        single_step: StatusLed::new(Output::new(p.PIN_6, Level::Low)),
        low_freq: StatusLed::new(Output::new(p.PIN_7, Level::Low)),
        high_freq: StatusLed::new(Output::new(p.PIN_8, Level::Low)),
        remote: StatusLed::new(Output::new(p.PIN_10, Level::Low)),
        reset_low: StatusLed::new(Output::new(p.PIN_15, Level::Low)),
        reset_done: StatusLed::new(Output::new(p.PIN_18, Level::Low)),
        power_on: StatusLed::new(Output::new(p.PIN_19, Level::Low)),
    };

    // Reset line idles high; power line idles high (= off, inverted logic)
    let board = PicoBoard::new(
        SIGNAL_CHANNEL.sender(),
        ResetOutput::new(Output::new(p.PIN_13, Level::High)),
        PowerOutput::new(Output::new(p.PIN_14, Level::High)),
    );

    info!("Peripherals initialized");

    spawner
        .spawn(control_task(
            board,
            buttons,
            leds,
            console_tx,
            mirror_tx,
            CONSOLE_BYTES.receiver(),
        ))
        .unwrap();
}

/// Milliseconds since boot, wrapped to the controller's clock width
fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

/// Pump received console bytes into the control task's queue
#[embassy_executor::task]
async fn console_reader_task(mut rx: BufferedUartRx<'static>, bytes: ByteSender) {
    let mut buf = [0u8; 16];
    loop {
        match rx.read(&mut buf).await {
            Ok(n) => {
                for &byte in &buf[..n] {
                    bytes.send(byte).await;
                }
            }
            Err(_) => defmt::warn!("console read error"),
        }
    }
}

/// The 10 ms polling loop
///
/// Gathers inputs, runs the controller one tick, then drains its text
/// buffers out to the two UARTs and refreshes the LED bank.
#[embassy_executor::task]
async fn control_task(
    mut board: PicoBoard,
    buttons: Buttons<'static>,
    mut leds: LedBank<'static>,
    mut console_tx: BufferedUartTx<'static>,
    mut mirror_tx: UartTx<'static, Blocking>,
    bytes: ByteReceiver,
) {
    let mut controller = Controller::new();
    controller.startup(now_ms(), &mut board);
    flush_output(&mut controller, &mut console_tx, &mut mirror_tx).await;

    let mut ticker = Ticker::every(Duration::from_millis(u64::from(UPDATE_INTERVAL_MS)));
    loop {
        ticker.next().await;
        let now = now_ms();

        while let Ok(byte) = bytes.try_receive() {
            controller.handle_console_byte(byte, now, &mut board);
        }

        controller.poll(now, &buttons.levels(), &mut board);

        let snapshot = controller.led_snapshot(now);
        leds.show(&snapshot);

        flush_output(&mut controller, &mut console_tx, &mut mirror_tx).await;
    }
}

/// Drain the controller's queued text onto the wire
async fn flush_output(
    controller: &mut Controller,
    console_tx: &mut BufferedUartTx<'static>,
    mirror_tx: &mut UartTx<'static, Blocking>,
) {
    if !controller.console_output().is_empty() {
        let text: heapless::String<1024> =
            heapless::String::try_from(controller.console_output()).unwrap_or_default();
        controller.clear_console();
        let _ = console_tx.write_all(text.as_bytes()).await;
    }

    if !controller.mirror_output().is_empty() {
        let text: heapless::String<512> =
            heapless::String::try_from(controller.mirror_output()).unwrap_or_default();
        controller.clear_mirror();
        let _ = mirror_tx.blocking_write(text.as_bytes());
    }
}
