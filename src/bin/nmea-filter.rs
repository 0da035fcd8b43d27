use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use nmea_filter::{
    io::{IoSink, IoSource},
    storage::{FullStorage, SmallStorage, StandardStorage, StaticStorage},
    FilterError, SentenceFilter, Tag,
};
use serialport::{DataBits, Parity, SerialPort, StopBits};
use std::io::{BufReader, ErrorKind, Read, Write};
use std::time::Duration;

/// Forward only the NMEA sentences of one type from a GNSS receiver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Serial port connected to the receiver [default: standard input]
    #[arg(long)]
    input: Option<String>,
    /// Serial port where sentences are forwarded [default: standard output]
    #[arg(long)]
    output: Option<String>,
    /// Serial port baud rate
    #[arg(long, default_value_t = 57_600)]
    baud: u32,
    /// Tag of the sentences to forward
    #[arg(long, default_value_t = Tag::GPGGA)]
    tag: Tag,
    /// Scratch buffer size
    #[arg(long, value_enum, default_value_t = Capacity::Standard)]
    capacity: Capacity,
}

#[derive(ValueEnum, Debug, Clone, Copy, Eq, PartialEq)]
enum Capacity {
    /// 60 bytes
    Small,
    /// 82 bytes (NMEA 0183 maximum sentence length)
    Standard,
    /// 256 bytes
    Full,
}

fn open_port(port: &str, baud: u32) -> Result<Box<dyn SerialPort>> {
    serialport::new(port, baud)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .timeout(Duration::from_secs(3600))
        .open()
        .with_context(|| format!("could not open serial port {}", port))
}

fn open_channels(args: &Args) -> Result<(Box<dyn Read>, Box<dyn Write>)> {
    match (&args.input, &args.output) {
        (Some(input), Some(output)) if input == output => {
            // The receiver and the forwarded sentences share a single UART
            let port = open_port(input, args.baud)?;
            let writer = port
                .try_clone()
                .with_context(|| format!("could not clone serial port {}", input))?;
            let read: Box<dyn Read> = Box::new(port);
            let write: Box<dyn Write> = Box::new(writer);
            Ok((read, write))
        }
        (input, output) => {
            let read: Box<dyn Read> = match input {
                Some(port) => Box::new(open_port(port, args.baud)?),
                None => Box::new(std::io::stdin()),
            };
            let write: Box<dyn Write> = match output {
                Some(port) => Box::new(open_port(port, args.baud)?),
                None => Box::new(std::io::stdout()),
            };
            Ok((read, write))
        }
    }
}

fn filter<S: StaticStorage>(tag: Tag, read: Box<dyn Read>, write: Box<dyn Write>) -> Result<()> {
    let mut source = IoSource::new(BufReader::new(read));
    let mut sink = IoSink::new(write);
    let mut filter = SentenceFilter::<S>::new(tag);
    loop {
        match filter.run(&mut source, &mut sink) {
            Ok(never) => match never {},
            Err(FilterError::Read(e)) if e.kind() == ErrorKind::UnexpectedEof => {
                log::info!("end of input; {}", filter.stats());
                return Ok(());
            }
            Err(FilterError::Read(e)) if e.kind() == ErrorKind::TimedOut => {
                log::debug!("serial port read timed out; resuming");
            }
            Err(e) => {
                log::info!("{}", filter.stats());
                return Err(e.into());
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let (read, write) = open_channels(&args)?;
    log::info!(
        "forwarding {} sentences (input {}, output {})",
        args.tag,
        args.input.as_deref().unwrap_or("stdin"),
        args.output.as_deref().unwrap_or("stdout")
    );
    match args.capacity {
        Capacity::Small => filter::<SmallStorage>(args.tag, read, write),
        Capacity::Standard => filter::<StandardStorage>(args.tag, read, write),
        Capacity::Full => filter::<FullStorage>(args.tag, read, write),
    }
}
