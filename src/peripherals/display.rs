//! Display control module for PineTime
//!
//! Text fields of the word clock laid out on the 240x240 ST7789 panel. Each
//! field remembers its text and colors, so it can be redrawn on its own.

use embassy_nrf::{
    gpio::Output,
    peripherals::{P0_18, P0_25, P0_26},
    spim::{self, Spim},
};

use display_interface_spi::SPIInterface;
use embassy_time::Delay;
use embedded_graphics::{
    mono_font::{iso_8859_1::FONT_10X20, MonoFont, MonoTextStyle},
    pixelcolor::{BinaryColor, Rgb565},
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use mipidsi::{models::ST7789, Builder, Orientation};
use pinetime_wordclock::{event::ColorPair, text::FieldText, TextField};
use profont::PROFONT_24_POINT;

const LCD_W: u16 = 240;
const LCD_H: u16 = 240;

/// Height of the status bar at the bottom
const STATUS_H: u32 = 24;

const FIELD_COUNT: usize = 5;

type Lcd<'a, SPI> = mipidsi::Display<
    SPIInterface<Spim<'a, SPI>, Output<'a, P0_18>, Output<'a, P0_25>>,
    ST7789,
    Output<'a, P0_26>,
>;

/// What is currently shown in a field
#[derive(Clone)]
struct FieldState {
    text: FieldText,
    colors: ColorPair,
}

pub struct Display<SPI>
where
    SPI: spim::Instance,
{
    lcd: Lcd<'static, SPI>,
    fields: [FieldState; FIELD_COUNT],
}

impl<SPI> Display<SPI>
where
    SPI: spim::Instance,
{
    /// Configure display settings on boot
    pub fn init(
        spim: Spim<'static, SPI>,
        cs_pin: Output<'static, P0_25>,
        dc_pin: Output<'static, P0_18>,
        rst_pin: Output<'static, P0_26>,
    ) -> Result<Self, Error> {
        let lcd = Builder::st7789(SPIInterface::new(spim, dc_pin, cs_pin))
            .with_display_size(LCD_W, LCD_H)
            .with_orientation(Orientation::Portrait(false))
            .init(&mut Delay, Some(rst_pin))
            .map_err(|_| Error::Init)?;

        let blank = FieldState {
            text: FieldText::new(),
            colors: ColorPair::NORMAL,
        };
        let mut display = Self {
            lcd,
            fields: [
                blank.clone(),
                blank.clone(),
                blank.clone(),
                blank.clone(),
                blank,
            ],
        };
        display.clear()?;
        Ok(display)
    }

    /// Paint the whole window black
    pub fn clear(&mut self) -> Result<(), Error> {
        self.lcd.clear(Rgb565::BLACK).map_err(|_| Error::Draw)
    }

    /// Replace the text of a field
    pub fn set_text(&mut self, field: TextField, text: &FieldText) -> Result<(), Error> {
        let state = &mut self.fields[slot(field)];
        if state.text == *text {
            return Ok(());
        }
        state.text = text.clone();
        self.redraw(field)
    }

    /// Recolor a field
    pub fn set_colors(&mut self, field: TextField, colors: ColorPair) -> Result<(), Error> {
        let state = &mut self.fields[slot(field)];
        if state.colors == colors {
            return Ok(());
        }
        state.colors = colors;
        self.redraw(field)
    }

    fn redraw(&mut self, field: TextField) -> Result<(), Error> {
        let state = &self.fields[slot(field)];
        let area = bounds(field);
        let foreground = rgb(state.colors.foreground);
        let background = rgb(state.colors.background);

        area.into_styled(PrimitiveStyle::with_fill(background))
            .draw(&mut self.lcd)
            .map_err(|_| Error::Draw)?;

        let character_style = MonoTextStyle::new(font(field), foreground);
        let text_style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        Text::with_text_style(&state.text, area.center(), character_style, text_style)
            .draw(&mut self.lcd)
            .map_err(|_| Error::Draw)?;

        Ok(())
    }
}

fn slot(field: TextField) -> usize {
    match field {
        TextField::Phrase => 0,
        TextField::Lead => 1,
        TextField::Connector => 2,
        TextField::Minute => 3,
        TextField::Status => 4,
    }
}

/// Screen area of a field
fn bounds(field: TextField) -> Rectangle {
    let width = LCD_W as u32;
    match field {
        TextField::Lead => Rectangle::new(Point::new(0, 0), Size::new(width, 40)),
        TextField::Connector => Rectangle::new(Point::new(0, 48), Size::new(width, 40)),
        TextField::Minute => Rectangle::new(Point::new(0, 88), Size::new(width, 40)),
        TextField::Phrase => Rectangle::new(Point::new(0, 48), Size::new(width, 40)),
        TextField::Status => Rectangle::new(
            Point::new(0, (LCD_H as u32 - STATUS_H) as i32),
            Size::new(width, STATUS_H),
        ),
    }
}

fn font(field: TextField) -> &'static MonoFont<'static> {
    match field {
        TextField::Lead | TextField::Connector | TextField::Minute => &PROFONT_24_POINT,
        // A full phrase needs up to 23 characters on one line
        TextField::Phrase | TextField::Status => &FONT_10X20,
    }
}

fn rgb(color: BinaryColor) -> Rgb565 {
    match color {
        BinaryColor::On => Rgb565::WHITE,
        BinaryColor::Off => Rgb565::BLACK,
    }
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    /// The controller did not accept the init sequence
    Init,
    /// Writing pixels failed
    Draw,
}
