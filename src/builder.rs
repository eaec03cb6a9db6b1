use crate::common::charset::CharacterSet;
use crate::common::error::QRResult;
use crate::common::mask::MaskPattern;
use crate::common::metadata::{ECLevel, Version};
use crate::encoder::{encode, EncodeHints, QRSymbol};

// QR builder
//------------------------------------------------------------------------------

pub struct QRBuilder<'a> {
    content: &'a str,
    version: Option<Version>,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
    character_set: Option<CharacterSet>,
    gs1: bool,
    margin: Option<u32>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            version: None,
            ec_level: ECLevel::M,
            mask: None,
            character_set: None,
            gs1: false,
            margin: None,
        }
    }

    pub fn content(&mut self, content: &'a str) -> &mut Self {
        self.content = content;
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn character_set(&mut self, character_set: CharacterSet) -> &mut Self {
        self.character_set = Some(character_set);
        self
    }

    pub fn gs1(&mut self, gs1: bool) -> &mut Self {
        self.gs1 = gs1;
        self
    }

    pub fn margin(&mut self, margin: u32) -> &mut Self {
        self.margin = Some(margin);
        self
    }

    pub fn metadata(&self) -> String {
        match self.version {
            Some(v) => format!("{{ Version: {}, Ec level: {:?} }}", v.number(), self.ec_level),
            None => format!("{{ Version: None, Ec level: {:?} }}", self.ec_level),
        }
    }
}

impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QRSymbol> {
        println!("\nGenerating QR {}...", self.metadata());

        let hints = EncodeHints {
            version: self.version,
            mask: self.mask,
            character_set: self.character_set,
            gs1: self.gs1,
            margin: self.margin,
        };
        let symbol = encode(self.content, self.ec_level, &hints)?;

        println!("\x1b[1;32mQR generated successfully!\n\x1b[0m");

        let version = symbol.version();
        let total_modules = (version.width() * version.width()) as usize;
        let dark_modules = symbol.count_dark_modules();
        let light_modules = total_modules - dark_modules;

        println!("Report:");
        println!("{}", symbol.metadata());
        println!(
            "Data capacity: {}, Error capacity: {}",
            version.data_codewords(symbol.ec_level()),
            Self::ec_capacity(version, symbol.ec_level())
        );
        println!(
            "Dark Cells: {}, Light Cells: {}, Balance: {}\n",
            dark_modules,
            light_modules,
            dark_modules * 100 / total_modules
        );

        Ok(symbol)
    }

    /// Number of codeword errors correctable at this version and level
    pub fn ec_capacity(version: Version, ec_level: ECLevel) -> usize {
        // The smallest symbols reserve p codewords for misdecode protection
        let p = match (version.number(), ec_level) {
            (1, ECLevel::L) => 3,
            (2, ECLevel::L) | (1, ECLevel::M) => 2,
            (1, _) | (3, ECLevel::L) => 1,
            _ => 0,
        };

        let ec_bytes = version.ec_blocks(ec_level).total_ec_codewords();
        (ec_bytes - p) / 2
    }
}
