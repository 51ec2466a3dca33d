use lombax_common::BeReader;
use zerocopy::byteorder::big_endian::U32;

use crate::records::UiElementRecord;
use crate::{Result, UiElement};

/// Decode the UI element table and each element's sprite list.
pub fn read_ui_elements(data: &[u8], pointer: u32) -> Result<Vec<UiElement>> {
    if pointer == 0 {
        return Ok(Vec::new());
    }

    let mut reader = BeReader::new_at(data, pointer as usize);
    let count = usize::from(reader.read_u16()?);
    reader.advance(2);

    reader
        .read_slice::<UiElementRecord>(count)?
        .iter()
        .map(|r| -> Result<UiElement> {
            let sprites = match r.sprites.get() {
                0 => Vec::new(),
                pointer => BeReader::new_at(data, pointer as usize)
                    .read_slice::<U32>(usize::from(r.sprite_count.get()))?
                    .iter()
                    .map(|s| s.get())
                    .collect(),
            };
            Ok(UiElement {
                id: r.id.get(),
                sprites,
            })
        })
        .collect()
}
