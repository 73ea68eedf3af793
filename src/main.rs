//! Scoreboard firmware for the nRF52840.
//!
//! Two executors:
//!
//! - an interrupt executor on `EGU1_SWI1` runs the 1 ms tick task: it
//!   advances the tick counter, samples the buttons and queues events.
//! - the thread-mode executor runs the render loop: it drains the queue
//!   into the scoreboard, checks the timeout and redraws the display.
//!
//! The thread executor sleeps in WFE until the tick task signals.

#![no_std]
#![no_main]

use core::convert::Infallible;

use cortex_m_rt::entry;
use defmt::{info, unwrap, warn};
use embassy_executor::{Executor, InterruptExecutor};
use embassy_nrf::gpio::{Flex, Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::interrupt;
use embassy_nrf::interrupt::{InterruptExt, Priority};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::{Delay, Duration, Ticker};
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use scoreboard::clock::{Clock, TickCounter};
use scoreboard::config::{DIM_BRIGHTNESS, EVENT_QUEUE_DEPTH, TICK_INTERVAL_MS};
use scoreboard::display::tm1637::{DataPin, Tm1637};
use scoreboard::scoreboard::Scoreboard;
use scoreboard::ui::buttons::{ButtonInput, ButtonPins};
use scoreboard::ui::InputEvent;

type Display = Tm1637<Output<'static>, DioLine<'static>, Delay>;

static TICKS: TickCounter = TickCounter::new();
static EVENTS: Channel<CriticalSectionRawMutex, InputEvent, EVENT_QUEUE_DEPTH> = Channel::new();
/// Raised by the tick task after every tick.
static RENDER: Signal<CriticalSectionRawMutex, ()> = Signal::new();

static EXECUTOR_TICK: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_MAIN: StaticCell<Executor> = StaticCell::new();

#[interrupt]
unsafe fn EGU1_SWI1() {
    EXECUTOR_TICK.on_interrupt()
}

/// TM1637 DIO on a flex pin, switched between driving and listening.
struct DioLine<'d>(Flex<'d>);

impl ErrorType for DioLine<'_> {
    type Error = Infallible;
}

impl OutputPin for DioLine<'_> {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.set_low();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.set_high();
        Ok(())
    }
}

impl InputPin for DioLine<'_> {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.is_high())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.is_low())
    }
}

impl DataPin for DioLine<'_> {
    fn set_as_input(&mut self) -> Result<(), Infallible> {
        self.0.set_as_input(Pull::Up);
        Ok(())
    }

    fn set_as_output(&mut self) -> Result<(), Infallible> {
        self.0.set_as_output(OutputDrive::Standard);
        Ok(())
    }
}

#[entry]
fn main() -> ! {
    info!("Scoreboard starting...");

    let p = embassy_nrf::init(Default::default());

    // Buttons: P0.11 "-", P0.12 "+" (active-low, internal pull-up)
    let buttons = ButtonPins::new(Input::new(p.P0_11, Pull::Up), Input::new(p.P0_12, Pull::Up));

    // TM1637: CLK P0.27, DIO P0.26
    let clk = Output::new(p.P0_27, Level::High, OutputDrive::Standard);
    let mut dio = Flex::new(p.P0_26);
    dio.set_high();
    dio.set_as_output(OutputDrive::Standard);

    let mut display = Tm1637::new(clk, DioLine(dio), Delay, DIM_BRIGHTNESS);
    if display.init().is_err() {
        warn!("Display: init failed");
    }

    interrupt::EGU1_SWI1.set_priority(Priority::P6);
    let spawner = EXECUTOR_TICK.start(interrupt::EGU1_SWI1);
    unwrap!(spawner.spawn(tick_task(buttons)));

    let executor = EXECUTOR_MAIN.init(Executor::new());
    executor.run(|spawner| {
        unwrap!(spawner.spawn(render_task(display)));
        info!("All tasks spawned");
    })
}

/// Tick task - advances the clock and samples the buttons every tick.
#[embassy_executor::task]
async fn tick_task(mut pins: ButtonPins<Input<'static>>) {
    info!("Tick task started ({} ms)", TICK_INTERVAL_MS);

    let mut input = ButtonInput::default();
    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));

    loop {
        ticker.next().await;
        TICKS.advance();

        let pressed = pins.read().unwrap_or_else(|e| match e {});
        for event in input.sample(pressed) {
            if EVENTS.try_send(event).is_err() {
                warn!("Tick: event queue full, dropped {}", event);
            }
        }

        RENDER.signal(());
    }
}

/// Render loop - feeds queued events to the scoreboard and redraws.
#[embassy_executor::task]
async fn render_task(mut display: Display) {
    let mut board = Scoreboard::new(TICKS.now());
    info!("Render task started");

    loop {
        RENDER.wait().await;
        let now = TICKS.now();

        while let Ok(event) = EVENTS.try_receive() {
            info!("Event: {}", event);
            board.handle(event, now);
        }
        board.update(now);

        if let Err(e) = board.render(&mut display, now) {
            warn!("Display: update failed: {}", e);
        }
    }
}
