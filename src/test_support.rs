//! Builders for in-memory workbook fixtures used by the tests.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::write::{SimpleFileOptions, ZipWriter};

pub(crate) fn zip_archive(members: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in members {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(body).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub(crate) fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, bytes).unwrap();
    path
}

// ---------------------------------------------------------------------------
// xlsx

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Style indexes available in every xlsx fixture.
pub(crate) const XF_GENERAL: u32 = 0;
pub(crate) const XF_DATE: u32 = 1;
pub(crate) const XF_CUSTOM_DATE: u32 = 2;
pub(crate) const XF_TIME: u32 = 3;
pub(crate) const XF_GENERAL_UNIT: u32 = 4;

struct XlsxSheet {
    name: String,
    rows: Vec<String>,
    drawing: Option<String>,
}

/// A minimal but complete .xlsx package.
pub(crate) struct XlsxFixture {
    sheets: Vec<XlsxSheet>,
    shared_strings: Vec<String>,
    active_tab: usize,
    date1904: bool,
}

impl XlsxFixture {
    pub(crate) fn new() -> Self {
        XlsxFixture {
            sheets: Vec::new(),
            shared_strings: Vec::new(),
            active_tab: 0,
            date1904: false,
        }
    }

    pub(crate) fn sheet(mut self, name: &str) -> Self {
        self.sheets.push(XlsxSheet {
            name: name.to_string(),
            rows: Vec::new(),
            drawing: None,
        });
        self
    }

    /// Raw `<c>` element appended to the last sheet, in its own row.
    pub(crate) fn raw_cell(mut self, xml: &str) -> Self {
        let sheet = self.sheets.last_mut().expect("add a sheet first");
        sheet.rows.push(xml.to_string());
        self
    }

    pub(crate) fn shared_string(self, reference: &str, text: &str) -> Self {
        let index = self.shared_strings.len();
        let mut this = self;
        this.shared_strings.push(text.to_string());
        this.raw_cell(&format!(r#"<c r="{reference}" t="s"><v>{index}</v></c>"#))
    }

    pub(crate) fn inline_string(self, reference: &str, text: &str) -> Self {
        self.raw_cell(&format!(
            r#"<c r="{reference}" t="inlineStr"><is><t>{text}</t></is></c>"#
        ))
    }

    pub(crate) fn number(self, reference: &str, value: f64, style: u32) -> Self {
        self.raw_cell(&format!(r#"<c r="{reference}" s="{style}"><v>{value}</v></c>"#))
    }

    pub(crate) fn boolean(self, reference: &str, value: bool) -> Self {
        self.raw_cell(&format!(
            r#"<c r="{reference}" t="b"><v>{}</v></c>"#,
            u8::from(value)
        ))
    }

    /// Picture anchors given as (col, row) zero-based top-left and bottom-right.
    pub(crate) fn pictures(mut self, anchors: &[((u32, u32), (u32, u32))]) -> Self {
        let body: String = anchors
            .iter()
            .map(|&((c1, r1), (c2, r2))| picture_anchor(c1, r1, c2, r2))
            .collect();
        let sheet = self.sheets.last_mut().expect("add a sheet first");
        sheet.drawing = Some(drawing_xml(&body));
        self
    }

    pub(crate) fn active_tab(mut self, index: usize) -> Self {
        self.active_tab = index;
        self
    }

    pub(crate) fn date1904(mut self) -> Self {
        self.date1904 = true;
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let mut parts: Vec<(String, Vec<u8>)> = Vec::new();

        parts.push((
            "_rels/.rels".into(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{PKG_REL_NS}"><Relationship Id="rId1" Type="{REL_NS}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
            )
            .into_bytes(),
        ));

        let sheets_xml: String = self
            .sheets
            .iter()
            .enumerate()
            .map(|(i, s)| {
                format!(
                    r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                    s.name,
                    i + 1,
                    i + 1
                )
            })
            .collect();
        parts.push((
            "xl/workbook.xml".into(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="{MAIN_NS}" xmlns:r="{REL_NS}"><workbookPr date1904="{}"/><bookViews><workbookView activeTab="{}"/></bookViews><sheets>{sheets_xml}</sheets></workbook>"#,
                u8::from(self.date1904),
                self.active_tab
            )
            .into_bytes(),
        ));

        let mut workbook_rels: String = (0..self.sheets.len())
            .map(|i| {
                format!(
                    r#"<Relationship Id="rId{}" Type="{REL_NS}/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                    i + 1,
                    i + 1
                )
            })
            .collect();
        workbook_rels.push_str(&format!(
            r#"<Relationship Id="rIdS" Type="{REL_NS}/sharedStrings" Target="sharedStrings.xml"/><Relationship Id="rIdY" Type="{REL_NS}/styles" Target="styles.xml"/>"#
        ));
        parts.push((
            "xl/_rels/workbook.xml.rels".into(),
            format!(r#"<Relationships xmlns="{PKG_REL_NS}">{workbook_rels}</Relationships>"#)
                .into_bytes(),
        ));

        let sst: String = self
            .shared_strings
            .iter()
            .map(|s| format!("<si><t>{s}</t></si>"))
            .collect();
        parts.push((
            "xl/sharedStrings.xml".into(),
            format!(r#"<sst xmlns="{MAIN_NS}">{sst}</sst>"#).into_bytes(),
        ));
        parts.push((
            "xl/styles.xml".into(),
            format!(
                r#"<styleSheet xmlns="{MAIN_NS}"><numFmts count="2"><numFmt numFmtId="164" formatCode="yyyy&quot;年&quot;m&quot;月&quot;d&quot;日&quot;"/><numFmt numFmtId="165" formatCode="General&quot;個&quot;"/></numFmts><cellXfs count="5"><xf numFmtId="0"/><xf numFmtId="14"/><xf numFmtId="164"/><xf numFmtId="20"/><xf numFmtId="165"/></cellXfs></styleSheet>"#
            )
            .into_bytes(),
        ));

        for (i, sheet) in self.sheets.iter().enumerate() {
            let n = i + 1;
            let rows: String = sheet
                .rows
                .iter()
                .map(|cell| format!("<row>{cell}</row>"))
                .collect();
            let drawing_ref = if sheet.drawing.is_some() {
                r#"<drawing r:id="rIdD"/>"#
            } else {
                ""
            };
            parts.push((
                format!("xl/worksheets/sheet{n}.xml"),
                format!(
                    r#"<worksheet xmlns="{MAIN_NS}" xmlns:r="{REL_NS}"><sheetData>{rows}</sheetData>{drawing_ref}</worksheet>"#
                )
                .into_bytes(),
            ));
            if let Some(drawing) = &sheet.drawing {
                parts.push((
                    format!("xl/worksheets/_rels/sheet{n}.xml.rels"),
                    format!(
                        r#"<Relationships xmlns="{PKG_REL_NS}"><Relationship Id="rIdD" Type="{REL_NS}/drawing" Target="../drawings/drawing{n}.xml"/></Relationships>"#
                    )
                    .into_bytes(),
                ));
                parts.push((
                    format!("xl/drawings/drawing{n}.xml"),
                    drawing.clone().into_bytes(),
                ));
            }
        }

        let members: Vec<(&str, &[u8])> = parts
            .iter()
            .map(|(name, body)| (name.as_str(), body.as_slice()))
            .collect();
        zip_archive(&members)
    }
}

/// Rows without `r` attributes need the cell references to place them, so
/// every fixture row holds one explicit-reference cell.
pub(crate) fn picture_anchor(col: u32, row: u32, to_col: u32, to_row: u32) -> String {
    format!(
        r#"<xdr:twoCellAnchor editAs="oneCell"><xdr:from><xdr:col>{col}</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>{row}</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from><xdr:to><xdr:col>{to_col}</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>{to_row}</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:to><xdr:pic><xdr:nvPicPr><xdr:cNvPr id="2" name="Picture 1"/><xdr:cNvPicPr/></xdr:nvPicPr><xdr:blipFill><a:blip r:embed="rId1"/></xdr:blipFill><xdr:spPr/></xdr:pic><xdr:clientData/></xdr:twoCellAnchor>"#
    )
}

pub(crate) fn drawing_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="{REL_NS}" xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006">{body}</xdr:wsDr>"#
    )
}

// ---------------------------------------------------------------------------
// xls

pub(crate) fn biff_record(kind: u16, body: &[u8]) -> Vec<u8> {
    let mut out = kind.to_le_bytes().to_vec();
    out.extend_from_slice(&(body.len() as u16).to_le_bytes());
    out.extend_from_slice(body);
    out
}

/// BIFF8 XLUnicodeString with a 16-bit count, stored wide.
pub(crate) fn biff_string(text: &str) -> Vec<u8> {
    let units: Vec<u16> = text.encode_utf16().collect();
    let mut out = (units.len() as u16).to_le_bytes().to_vec();
    out.push(0x01);
    out.extend(units.iter().flat_map(|u| u.to_le_bytes()));
    out
}

fn cell_header(row: u16, col: u16, xf: u16) -> Vec<u8> {
    [row, col, xf].iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// XF indexes available in every xls fixture.
pub(crate) const XLS_XF_GENERAL: u16 = 0;
pub(crate) const XLS_XF_DATE: u16 = 1;
pub(crate) const XLS_XF_CUSTOM_DATE: u16 = 2;
pub(crate) const XLS_XF_GENERAL_UNIT: u16 = 3;

/// A BIFF8 workbook built record by record.
pub(crate) struct XlsFixture {
    sheets: Vec<(String, Vec<u8>)>,
    sst: Vec<String>,
    active: u16,
    date1904: bool,
    encrypted: bool,
}

impl XlsFixture {
    pub(crate) fn new() -> Self {
        XlsFixture {
            sheets: Vec::new(),
            sst: Vec::new(),
            active: 0,
            date1904: false,
            encrypted: false,
        }
    }

    pub(crate) fn sheet(mut self, name: &str) -> Self {
        self.sheets.push((name.to_string(), Vec::new()));
        self
    }

    /// Append a raw record to the last sheet's substream.
    pub(crate) fn record(mut self, kind: u16, body: &[u8]) -> Self {
        let sheet = self.sheets.last_mut().expect("add a sheet first");
        sheet.1.extend(biff_record(kind, body));
        self
    }

    pub(crate) fn number(self, row: u16, col: u16, value: f64, xf: u16) -> Self {
        let mut body = cell_header(row, col, xf);
        body.extend_from_slice(&value.to_le_bytes());
        self.record(0x0203, &body)
    }

    pub(crate) fn rk(self, row: u16, col: u16, rk: u32, xf: u16) -> Self {
        let mut body = cell_header(row, col, xf);
        body.extend_from_slice(&rk.to_le_bytes());
        self.record(0x027E, &body)
    }

    pub(crate) fn shared_string(mut self, row: u16, col: u16, text: &str) -> Self {
        let index = self.sst.len() as u32;
        self.sst.push(text.to_string());
        let mut body = cell_header(row, col, XLS_XF_GENERAL);
        body.extend_from_slice(&index.to_le_bytes());
        self.record(0x00FD, &body)
    }

    pub(crate) fn label(self, row: u16, col: u16, text: &str) -> Self {
        let mut body = cell_header(row, col, XLS_XF_GENERAL);
        body.extend(biff_string(text));
        self.record(0x0204, &body)
    }

    pub(crate) fn boolean(self, row: u16, col: u16, value: bool) -> Self {
        let mut body = cell_header(row, col, XLS_XF_GENERAL);
        body.extend_from_slice(&[u8::from(value), 0]);
        self.record(0x0205, &body)
    }

    pub(crate) fn error(self, row: u16, col: u16, code: u8) -> Self {
        let mut body = cell_header(row, col, XLS_XF_GENERAL);
        body.extend_from_slice(&[code, 1]);
        self.record(0x0205, &body)
    }

    /// FORMULA whose cached result is a string, followed by its STRING record.
    pub(crate) fn formula_string(self, row: u16, col: u16, text: &str) -> Self {
        let mut body = cell_header(row, col, XLS_XF_GENERAL);
        body.extend_from_slice(&[0x00, 0, 0, 0, 0, 0, 0xFF, 0xFF]);
        body.extend_from_slice(&[0; 6]);
        body.extend_from_slice(&[0, 0]);
        self.record(0x0006, &body).record(0x0207, &biff_string(text))
    }

    /// Drawing data split across an MSODRAWING and CONTINUE records.
    pub(crate) fn drawing(self, escher: &[u8]) -> Self {
        let (first, rest) = escher.split_at(escher.len().min(24));
        let mut this = self.record(0x00EC, first);
        for chunk in rest.chunks(40) {
            this = this.record(0x003C, chunk);
        }
        this
    }

    pub(crate) fn active(mut self, index: u16) -> Self {
        self.active = index;
        self
    }

    pub(crate) fn date1904(mut self) -> Self {
        self.date1904 = true;
        self
    }

    pub(crate) fn encrypted(mut self) -> Self {
        self.encrypted = true;
        self
    }

    /// The raw BIFF8 workbook stream.
    pub(crate) fn stream(&self) -> Vec<u8> {
        let bof = |kind: u16| {
            let mut body = 0x0600u16.to_le_bytes().to_vec();
            body.extend_from_slice(&kind.to_le_bytes());
            body.extend_from_slice(&[0; 12]);
            biff_record(0x0809, &body)
        };

        let mut globals = bof(0x0005);
        if self.encrypted {
            globals.extend(biff_record(0x002F, &[0; 6]));
        }
        globals.extend(biff_record(0x0042, &1200u16.to_le_bytes()));
        globals.extend(biff_record(0x0022, &u16::from(self.date1904).to_le_bytes()));
        let mut window = vec![0u8; 18];
        window[10..12].copy_from_slice(&self.active.to_le_bytes());
        globals.extend(biff_record(0x003D, &window));

        for (ifmt, code) in [(164u16, "yyyy\"年\"m\"月\"d\"日\""), (165, "General\"個\"")] {
            let mut format = ifmt.to_le_bytes().to_vec();
            format.extend(biff_string(code));
            globals.extend(biff_record(0x041E, &format));
        }
        for ifmt in [0u16, 14, 164, 165] {
            let mut xf = vec![0u8; 20];
            xf[2..4].copy_from_slice(&ifmt.to_le_bytes());
            globals.extend(biff_record(0x00E0, &xf));
        }

        let mut sst = (self.sst.len() as u32).to_le_bytes().to_vec();
        sst.extend_from_slice(&(self.sst.len() as u32).to_le_bytes());
        for s in &self.sst {
            sst.extend(biff_string(s));
        }
        globals.extend(biff_record(0x00FC, &sst));

        // BOUNDSHEET positions are patched once the globals length is known.
        let boundsheet_len = |name: &str| 4 + 6 + 2 + name.encode_utf16().count() * 2;
        let globals_len = globals.len()
            + self
                .sheets
                .iter()
                .map(|(name, _)| boundsheet_len(name))
                .sum::<usize>()
            + 4;

        let mut position = globals_len;
        let mut substreams = Vec::new();
        for (name, records) in &self.sheets {
            let units: Vec<u16> = name.encode_utf16().collect();
            let mut body = (position as u32).to_le_bytes().to_vec();
            body.extend_from_slice(&[0, 0]);
            body.push(units.len() as u8);
            body.push(0x01);
            body.extend(units.iter().flat_map(|u| u.to_le_bytes()));
            globals.extend(biff_record(0x0085, &body));

            let mut substream = bof(0x0010);
            substream.extend_from_slice(records);
            substream.extend(biff_record(0x000A, &[]));
            position += substream.len();
            substreams.push(substream);
        }
        globals.extend(biff_record(0x000A, &[]));
        debug_assert_eq!(globals.len(), globals_len);

        for substream in substreams {
            globals.extend(substream);
        }
        globals
    }

    /// The stream wrapped in a compound file.
    pub(crate) fn build(&self) -> Vec<u8> {
        compound_file("/Workbook", &self.stream())
    }
}

pub(crate) fn compound_file(stream_name: &str, stream: &[u8]) -> Vec<u8> {
    let mut compound = cfb::CompoundFile::create(Cursor::new(Vec::new())).unwrap();
    compound
        .create_stream(stream_name)
        .unwrap()
        .write_all(stream)
        .unwrap();
    compound.flush().unwrap();
    compound.into_inner().into_inner()
}

// ---------------------------------------------------------------------------
// Escher

pub(crate) fn escher_record(version: u16, instance: u16, kind: u16, body: &[u8]) -> Vec<u8> {
    let mut out = ((instance << 4) | version).to_le_bytes().to_vec();
    out.extend_from_slice(&kind.to_le_bytes());
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(body);
    out
}

fn escher_container(kind: u16, children: &[Vec<u8>]) -> Vec<u8> {
    escher_record(0x0F, 0, kind, &children.concat())
}

fn client_anchor(col: u16, row: u16) -> Vec<u8> {
    let words: [u16; 9] = [0x0002, col, 0, row, 0, col + 2, 0, row + 2, 0];
    escher_record(0, 0, 0xF010, &words.iter().flat_map(|w| w.to_le_bytes()).collect::<Vec<_>>())
}

fn sp(shape_type: u16, flags: u32) -> Vec<u8> {
    let mut body = 1024u32.to_le_bytes().to_vec();
    body.extend_from_slice(&flags.to_le_bytes());
    escher_record(2, shape_type, 0xF00A, &body)
}

/// Picture frame shape anchored at (col, row).
pub(crate) fn escher_picture(col: u16, row: u16) -> Vec<u8> {
    let mut opt = 0x4104u16.to_le_bytes().to_vec();
    opt.extend_from_slice(&1u32.to_le_bytes());
    escher_container(
        0xF004,
        &[
            sp(75, 0x0A00),
            escher_record(3, 1, 0xF00B, &opt),
            client_anchor(col, row),
            escher_record(0, 0, 0xF011, &[]),
        ],
    )
}

/// Non-picture shape (a rectangle) anchored at (col, row).
pub(crate) fn escher_rectangle(col: u16, row: u16) -> Vec<u8> {
    escher_container(
        0xF004,
        &[
            sp(1, 0x0A00),
            client_anchor(col, row),
            escher_record(0, 0, 0xF011, &[]),
        ],
    )
}

/// Group anchored at (col, row) whose members only carry child anchors.
pub(crate) fn escher_group(col: u16, row: u16, members: usize) -> Vec<u8> {
    let mut children = vec![escher_container(
        0xF004,
        &[
            escher_record(1, 0, 0xF009, &[0; 16]),
            sp(0, 0x0201),
            client_anchor(col, row),
        ],
    )];
    for _ in 0..members {
        let mut opt = 0x4104u16.to_le_bytes().to_vec();
        opt.extend_from_slice(&1u32.to_le_bytes());
        children.push(escher_container(
            0xF004,
            &[
                sp(75, 0x0A02),
                escher_record(3, 1, 0xF00B, &opt),
                escher_record(0, 0, 0xF00F, &[0; 16]),
            ],
        ));
    }
    escher_container(0xF003, &children)
}

/// Sheet drawing: DgContainer holding the patriarch group and `shapes`.
pub(crate) fn escher_drawing(shapes: &[Vec<u8>]) -> Vec<u8> {
    let patriarch = escher_container(
        0xF004,
        &[escher_record(1, 0, 0xF009, &[0; 16]), sp(0, 0x0005)],
    );
    let mut group = vec![patriarch];
    group.extend(shapes.iter().cloned());
    escher_container(
        0xF002,
        &[
            escher_record(0, 1, 0xF008, &[0; 8]),
            escher_container(0xF003, &group),
        ],
    )
}
