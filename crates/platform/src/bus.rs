//! Panel bus abstraction
//!
//! A display controller on a 4-wire serial link: chip select, a data/command
//! select line, and a shift register that is switched to 16-bit frames while
//! pixels are streamed.

/// Command/data link to a display controller.
///
/// Every method is synchronous; implementations block only for the time a
/// single frame needs to leave the shift register. Bulk pixel data never goes
/// through this trait, it is handed to a [`DmaStream`](crate::DmaStream).
pub trait PanelBus {
    /// Error type
    type Error: core::fmt::Debug;

    /// Assert chip select.
    fn select(&mut self) -> Result<(), Self::Error>;

    /// Wait for the link to go idle, release chip select and return to 8-bit
    /// frames.
    fn deselect(&mut self) -> Result<(), Self::Error>;

    /// Send one command byte with the data/command line low.
    fn write_command(&mut self, command: u8) -> Result<(), Self::Error>;

    /// Send parameter bytes with the data/command line high.
    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Send one 16-bit parameter, most significant byte first.
    fn write_data16(&mut self, word: u16) -> Result<(), Self::Error> {
        self.write_data(&word.to_be_bytes())
    }

    /// Raise the data/command line and switch to 16-bit frames so that a
    /// following DMA stream feeds whole RGB565 words.
    fn begin_stream(&mut self) -> Result<(), Self::Error>;
}

impl<T: PanelBus + ?Sized> PanelBus for &mut T {
    type Error = T::Error;

    fn select(&mut self) -> Result<(), Self::Error> {
        (**self).select()
    }

    fn deselect(&mut self) -> Result<(), Self::Error> {
        (**self).deselect()
    }

    fn write_command(&mut self, command: u8) -> Result<(), Self::Error> {
        (**self).write_command(command)
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write_data(data)
    }

    fn write_data16(&mut self, word: u16) -> Result<(), Self::Error> {
        (**self).write_data16(word)
    }

    fn begin_stream(&mut self) -> Result<(), Self::Error> {
        (**self).begin_stream()
    }
}
