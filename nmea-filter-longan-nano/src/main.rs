#![no_std]
#![no_main]

use crate::pac::USART0;
use core::convert::Infallible;
use longan_nano::hal::{pac, prelude::*, serial};
use nb::block;
use nmea_filter::{
    channel::{ByteSink, ByteSource},
    storage::StandardStorage,
    SentenceFilter, Tag,
};
use panic_halt as _;
use riscv_rt::entry;

// The Locosys LS20031 receiver runs at 57600 baud, 8N1
const BAUD_RATE: u32 = 57_600;
const TARGET: Tag = Tag::GPGGA;

// The receiver TX line goes to PA10 (USART0 RX), and the filtered sentences
// are sent on PA9 (USART0 TX).
struct Board {
    rx: UartRx,
    tx: UartTx,
}

impl Board {
    fn take() -> Board {
        let p = pac::Peripherals::take().unwrap();
        let mut rcu = p
            .RCU
            .configure()
            .ext_hf_clock(8.mhz())
            .sysclk(108.mhz())
            .freeze();
        let mut afio = p.AFIO.constrain(&mut rcu);
        let gpioa = p.GPIOA.split(&mut rcu);
        let serial = serial::Serial::new(
            p.USART0,
            (gpioa.pa9, gpioa.pa10),
            serial::Config::default().baudrate(BAUD_RATE.bps()),
            &mut afio,
            &mut rcu,
        );
        let (tx, rx) = serial.split();
        Board {
            rx: UartRx(rx),
            tx: UartTx(tx),
        }
    }
}

struct UartRx(serial::Rx<USART0>);

impl ByteSource for UartRx {
    type Error = serial::Error;

    fn read_byte(&mut self) -> Result<u8, serial::Error> {
        block!(self.0.read())
    }
}

struct UartTx(serial::Tx<USART0>);

impl ByteSink for UartTx {
    type Error = Infallible;

    fn write_byte(&mut self, byte: u8) -> Result<(), Infallible> {
        block!(self.0.write(byte))
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        block!(self.0.flush())
    }
}

#[entry]
fn main() -> ! {
    let Board { mut rx, mut tx } = Board::take();
    let mut filter = SentenceFilter::<StandardStorage>::new(TARGET);

    loop {
        match filter.run(&mut rx, &mut tx) {
            Ok(never) => match never {},
            Err(_) => {
                // A framing, noise or overrun error means that the sentence
                // being received is corrupted
                filter.reset();
            }
        }
    }
}
