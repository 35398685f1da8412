/// Single fixed analog input returning raw converter counts.
///
/// A read is expected to complete in negligible time relative to the
/// sampling interval and to return a value in `[0, max_count]` for the
/// converter it fronts.
pub trait AnalogInput {
    fn read(&mut self) -> u16;
}

impl<T: AnalogInput + ?Sized> AnalogInput for &mut T {
    fn read(&mut self) -> u16 {
        (**self).read()
    }
}

impl<T: AnalogInput + ?Sized> AnalogInput for Box<T> {
    fn read(&mut self) -> u16 {
        (**self).read()
    }
}
