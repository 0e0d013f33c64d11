// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Group-level RDS decoder.
//!
//! Turns the stream of raw groups delivered by a receiver chip into three
//! debounced channels: programme service name (0A/0B), radio text (2A) and
//! clock time (4A). Values are pushed to single-slot callbacks from inside
//! [`RdsDecoder::ingest`], and only when they are confirmed and changed.

use std::fmt;

use tracing::{debug, trace};

use fmrx_core::{ClockTime, GroupHeader, GroupType, RdsGroup};

const PS_LEN: usize = 8;
const RT_LEN: usize = 64;
const PS_PLACEHOLDER: [u8; PS_LEN] = *b"--------";
const PS_BLANK: [u8; PS_LEN] = *b"        ";
/// Carriage return ends a radio text shorter than 64 characters.
const RT_END: u8 = 0x0d;
const MINUTES_PER_DAY: i32 = 24 * 60;

type TextSink = Box<dyn FnMut(&str) + Send>;
type TimeSink = Box<dyn FnMut(ClockTime) + Send>;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Assembly {
    /// Last pair seen at each PS offset.
    ps_candidate: [u8; PS_LEN],
    /// Pairs seen twice in a row.
    ps_confirmed: [u8; PS_LEN],
    ps_published: [u8; PS_LEN],
    rt_bytes: [u8; RT_LEN],
    rt_ab_flag: bool,
    rt_last_index: usize,
    rt_published: String,
    ct_last_minutes: Option<u16>,
    ct_published: Option<ClockTime>,
    header: Option<GroupHeader>,
}

impl Assembly {
    fn new() -> Self {
        Self {
            ps_candidate: PS_PLACEHOLDER,
            ps_confirmed: PS_PLACEHOLDER,
            ps_published: PS_BLANK,
            rt_bytes: [0; RT_LEN],
            rt_ab_flag: false,
            rt_last_index: 0,
            rt_published: String::new(),
            ct_last_minutes: None,
            ct_published: None,
            header: None,
        }
    }

    fn service_name_segment(&mut self, block2: u16, block4: u16) -> Option<String> {
        let idx = 2 * usize::from(block2 & 0x0003);
        let pair = block4.to_be_bytes();

        if self.ps_candidate[idx..idx + 2] != pair {
            self.ps_candidate[idx..idx + 2].copy_from_slice(&pair);
            return None;
        }

        self.ps_confirmed[idx..idx + 2].copy_from_slice(&pair);
        if idx == 6
            && self.ps_candidate == self.ps_confirmed
            && self.ps_confirmed != self.ps_published
        {
            self.ps_published = self.ps_confirmed;
            return Some(render_service_name(&self.ps_published));
        }
        None
    }

    fn radio_text_segment(&mut self, block2: u16, block3: u16, block4: u16) -> Option<String> {
        let text_ab = (block2 >> 4) & 0x1 != 0;
        let idx = 4 * usize::from(block2 & 0x000f);

        // Segment index went backwards: the station started the cycle over.
        let mut published = None;
        if idx < self.rt_last_index {
            let text = render_radio_text(&self.rt_bytes);
            if text != self.rt_published {
                self.rt_published = text.clone();
                published = Some(text);
            }
        }
        self.rt_last_index = idx;

        if text_ab != self.rt_ab_flag {
            trace!("RDS text A/B flag toggled, clearing buffer");
            self.rt_ab_flag = text_ab;
            self.rt_bytes = [0; RT_LEN];
        }

        let [c0, c1] = block3.to_be_bytes();
        let [d0, d1] = block4.to_be_bytes();
        self.rt_bytes[idx..idx + 4].copy_from_slice(&[c0, c1, d0, d1]);
        published
    }

    fn clock_time(&mut self, block2: u16, block3: u16, block4: u16) -> Option<ClockTime> {
        let utc_hour = ((block3 & 0x0001) << 4) | ((block4 >> 12) & 0x000f);
        let utc_minute = (block4 >> 6) & 0x003f;
        let raw_offset = block4 & 0x003f;
        let magnitude = (raw_offset & 0x001f) as i8;
        let offset = if raw_offset & 0x0020 != 0 {
            -magnitude
        } else {
            magnitude
        };
        let utc_mjd = (u32::from(block2 & 0x0003) << 15) | u32::from(block3 >> 1);

        let local = i32::from(utc_hour) * 60 + i32::from(utc_minute) + 30 * i32::from(offset);
        let minutes = local.rem_euclid(MINUTES_PER_DAY) as u16;
        if self.ct_last_minutes == Some(minutes) {
            return None;
        }
        self.ct_last_minutes = Some(minutes);

        let time = ClockTime {
            hour: (minutes / 60) as u8,
            minute: (minutes % 60) as u8,
            mjd: utc_mjd.saturating_add_signed(local.div_euclid(MINUTES_PER_DAY)),
            utc_offset_half_hours: offset,
        };
        self.ct_published = Some(time);
        Some(time)
    }
}

/// Decoder for the group stream of one tuned station.
///
/// Owned by a single caller; callbacks run synchronously on the caller's
/// stack and must not call back into the decoder.
pub struct RdsDecoder {
    state: Assembly,
    service_name_sink: Option<TextSink>,
    radio_text_sink: Option<TextSink>,
    clock_time_sink: Option<TimeSink>,
}

impl RdsDecoder {
    pub fn new() -> Self {
        Self {
            state: Assembly::new(),
            service_name_sink: None,
            radio_text_sink: None,
            clock_time_sink: None,
        }
    }

    /// Register the programme service name callback, replacing any previous one.
    /// Always called with exactly 8 characters.
    pub fn on_service_name<F>(&mut self, sink: F)
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.service_name_sink = Some(Box::new(sink));
    }

    /// Register the radio text callback, replacing any previous one.
    pub fn on_radio_text<F>(&mut self, sink: F)
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.radio_text_sink = Some(Box::new(sink));
    }

    /// Register the clock time callback, replacing any previous one.
    pub fn on_clock_time<F>(&mut self, sink: F)
    where
        F: FnMut(ClockTime) + Send + 'static,
    {
        self.clock_time_sink = Some(Box::new(sink));
    }

    /// Drop everything assembled so far. No callbacks are invoked.
    pub fn reset(&mut self) {
        self.state = Assembly::new();
    }

    pub fn ingest_blocks(&mut self, block1: u16, block2: u16, block3: u16, block4: u16) {
        self.ingest(RdsGroup::new(block1, block2, block3, block4));
    }

    /// Process one received group.
    ///
    /// A group with `block1 == 0` resets the decoder and pushes the blank
    /// name and an empty text so displays drop the previous station.
    pub fn ingest(&mut self, group: RdsGroup) {
        trace!("RDS group {}", group);

        if group.is_clear() {
            self.reset();
            let blank = render_service_name(&self.state.ps_published);
            self.emit_service_name(&blank);
            self.emit_radio_text("");
            return;
        }

        let header = group.header();
        self.state.header = Some(header);

        match header.group_type {
            GroupType::BASIC_TUNING_A | GroupType::BASIC_TUNING_B => {
                if let Some(name) = self
                    .state
                    .service_name_segment(group.block2, group.block4)
                {
                    debug!("RDS PS {:04X}: \"{}\"", header.pi, name);
                    self.emit_service_name(&name);
                }
            }
            GroupType::RADIO_TEXT_A => {
                if let Some(text) =
                    self.state
                        .radio_text_segment(group.block2, group.block3, group.block4)
                {
                    debug!("RDS RT {:04X}: \"{}\"", header.pi, text);
                    self.emit_radio_text(&text);
                }
            }
            GroupType::CLOCK_TIME_A => {
                if let Some(time) = self
                    .state
                    .clock_time(group.block2, group.block3, group.block4)
                {
                    debug!("RDS CT {:04X}: {}", header.pi, time);
                    if let Some(sink) = self.clock_time_sink.as_mut() {
                        sink(time);
                    }
                }
            }
            // In-house, TMC and everything else carry nothing we publish.
            _ => {}
        }
    }

    /// Last published programme service name (8 characters, blank before the first).
    pub fn service_name(&self) -> String {
        render_service_name(&self.state.ps_published)
    }

    /// Last published radio text.
    pub fn radio_text(&self) -> &str {
        &self.state.rt_published
    }

    pub fn clock_time(&self) -> Option<ClockTime> {
        self.state.ct_published
    }

    /// Header of the most recent non-sentinel group, whatever its type.
    pub fn last_header(&self) -> Option<GroupHeader> {
        self.state.header
    }

    fn emit_service_name(&mut self, name: &str) {
        if let Some(sink) = self.service_name_sink.as_mut() {
            sink(name);
        }
    }

    fn emit_radio_text(&mut self, text: &str) {
        if let Some(sink) = self.radio_text_sink.as_mut() {
            sink(text);
        }
    }
}

impl Default for RdsDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RdsDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RdsDecoder")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

fn sanitize_text_byte(byte: u8) -> u8 {
    if (0x20..=0x7e).contains(&byte) {
        byte
    } else {
        b' '
    }
}

fn render_service_name(bytes: &[u8; PS_LEN]) -> String {
    bytes
        .iter()
        .map(|&b| char::from(sanitize_text_byte(b)))
        .collect()
}

fn render_radio_text(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take_while(|&&b| b != 0 && b != RT_END)
        .map(|&b| char::from(sanitize_text_byte(b)))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use fmrx_core::RdsEvent;

    use super::*;

    const PI: u16 = 0x52ab;

    type Events = Arc<Mutex<Vec<RdsEvent>>>;

    fn recording_decoder() -> (RdsDecoder, Events) {
        let events: Events = Arc::new(Mutex::new(Vec::new()));
        let mut decoder = RdsDecoder::new();
        let sink = events.clone();
        decoder.on_service_name(move |name| {
            sink.lock().unwrap().push(RdsEvent::ServiceName {
                name: name.to_string(),
            })
        });
        let sink = events.clone();
        decoder.on_radio_text(move |text| {
            sink.lock().unwrap().push(RdsEvent::RadioText {
                text: text.to_string(),
            })
        });
        let sink = events.clone();
        decoder.on_clock_time(move |time| sink.lock().unwrap().push(RdsEvent::ClockTime(time)));
        (decoder, events)
    }

    fn take(events: &Events) -> Vec<RdsEvent> {
        std::mem::take(&mut *events.lock().unwrap())
    }

    fn ps(name: &str) -> RdsEvent {
        RdsEvent::ServiceName {
            name: name.to_string(),
        }
    }

    fn rt(text: &str) -> RdsEvent {
        RdsEvent::RadioText {
            text: text.to_string(),
        }
    }

    fn ps_group(segment: u16, chars: &[u8; 2]) -> RdsGroup {
        RdsGroup::new(PI, segment & 0x3, 0xe0cd, u16::from_be_bytes(*chars))
    }

    fn rt_group(text_ab: bool, segment: u16, chars: &[u8; 4]) -> RdsGroup {
        let block2 = 0x2000 | (u16::from(text_ab) << 4) | (segment & 0xf);
        RdsGroup::new(
            PI,
            block2,
            u16::from_be_bytes([chars[0], chars[1]]),
            u16::from_be_bytes([chars[2], chars[3]]),
        )
    }

    fn ct_group(mjd: u32, hour: u16, minute: u16, offset_half_hours: i8) -> RdsGroup {
        let offset_bits = if offset_half_hours < 0 {
            0x20 | u16::from(offset_half_hours.unsigned_abs())
        } else {
            offset_half_hours as u16
        };
        RdsGroup::new(
            PI,
            0x4000 | ((mjd >> 15) & 0x3) as u16,
            (((mjd & 0x7fff) as u16) << 1) | (hour >> 4),
            ((hour & 0xf) << 12) | ((minute & 0x3f) << 6) | (offset_bits & 0x3f),
        )
    }

    fn send_name_cycle(decoder: &mut RdsDecoder, name: &[u8; 8]) {
        for segment in 0..4u16 {
            let idx = usize::from(segment) * 2;
            decoder.ingest(ps_group(segment, &[name[idx], name[idx + 1]]));
        }
    }

    #[test]
    fn scenario_segments_confirmed_twice_publish_once() {
        let (mut decoder, events) = recording_decoder();

        decoder.ingest_blocks(0x1, 0x0, 0x0, 0x4142);
        decoder.ingest_blocks(0x1, 0x0, 0x0, 0x4142);
        assert_eq!(&decoder.state.ps_confirmed[..2], b"AB");
        assert!(take(&events).is_empty());

        for (segment, word) in [(1u16, 0x4344u16), (2, 0x4546)] {
            decoder.ingest_blocks(0x1, segment, 0x0, word);
            decoder.ingest_blocks(0x1, segment, 0x0, word);
        }
        assert!(take(&events).is_empty());

        decoder.ingest_blocks(0x1, 0x3, 0x0, 0x4748);
        assert!(take(&events).is_empty());
        decoder.ingest_blocks(0x1, 0x3, 0x0, 0x4748);
        assert_eq!(take(&events), vec![ps("ABCDEFGH")]);
        assert_eq!(decoder.service_name(), "ABCDEFGH");
    }

    #[test]
    fn name_published_after_two_full_cycles() {
        let (mut decoder, events) = recording_decoder();

        send_name_cycle(&mut decoder, b"RADIO 1 ");
        assert!(take(&events).is_empty());

        for segment in 0..3u16 {
            let idx = usize::from(segment) * 2;
            decoder.ingest(ps_group(segment, &[b"RADIO 1 "[idx], b"RADIO 1 "[idx + 1]]));
        }
        assert!(take(&events).is_empty());

        decoder.ingest(ps_group(3, b"1 "));
        assert_eq!(take(&events), vec![ps("RADIO 1 ")]);
    }

    #[test]
    fn single_receptions_never_publish() {
        let (mut decoder, events) = recording_decoder();

        // Every segment differs from the previous reception at that offset.
        for round in 0..8u8 {
            for segment in 0..4u16 {
                decoder.ingest(ps_group(segment, &[b'A' + round, b'a' + round]));
            }
        }
        assert!(take(&events).is_empty());
        assert_eq!(decoder.service_name(), "        ");
    }

    #[test]
    fn republishing_same_name_is_silent() {
        let (mut decoder, events) = recording_decoder();

        for _ in 0..2 {
            send_name_cycle(&mut decoder, b"ANTENNE ");
        }
        assert_eq!(take(&events), vec![ps("ANTENNE ")]);

        for _ in 0..5 {
            send_name_cycle(&mut decoder, b"ANTENNE ");
        }
        assert!(take(&events).is_empty());
    }

    #[test]
    fn changed_name_is_published_once_confirmed() {
        let (mut decoder, events) = recording_decoder();

        for _ in 0..2 {
            send_name_cycle(&mut decoder, b"NEWS 24 ");
        }
        assert_eq!(take(&events), vec![ps("NEWS 24 ")]);

        send_name_cycle(&mut decoder, b"TRAFFIC!");
        assert!(take(&events).is_empty());
        send_name_cycle(&mut decoder, b"TRAFFIC!");
        assert_eq!(take(&events), vec![ps("TRAFFIC!")]);
    }

    #[test]
    fn corrupted_segment_delays_publication() {
        let (mut decoder, events) = recording_decoder();

        send_name_cycle(&mut decoder, b"JAZZ FM ");
        decoder.ingest(ps_group(0, b"JA"));
        decoder.ingest(ps_group(1, b"Zx"));
        decoder.ingest(ps_group(2, b"FM"));
        decoder.ingest(ps_group(3, b"M "));
        // Candidate holds "Zx" at offset 2 while confirmed still has "--".
        assert!(take(&events).is_empty());

        send_name_cycle(&mut decoder, b"JAZZ FM ");
        assert!(take(&events).is_empty());
        send_name_cycle(&mut decoder, b"JAZZ FM ");
        assert_eq!(take(&events), vec![ps("JAZZ FM ")]);
    }

    #[test]
    fn version_b_name_groups_are_accepted() {
        let (mut decoder, events) = recording_decoder();
        for _ in 0..2 {
            for (segment, pair) in [b"CL", b"AS", b"SI", b"C "].iter().enumerate() {
                let word = u16::from_be_bytes(**pair);
                decoder.ingest_blocks(PI, 0x0800 | segment as u16, PI, word);
            }
        }
        assert_eq!(take(&events), vec![ps("CLASSIC ")]);
    }

    #[test]
    fn non_printable_name_bytes_render_as_spaces() {
        let (mut decoder, events) = recording_decoder();
        for _ in 0..2 {
            send_name_cycle(&mut decoder, b"FM\x00\x1fROCK");
        }
        assert_eq!(take(&events), vec![ps("FM  ROCK")]);
    }

    fn send_text(decoder: &mut RdsDecoder, text_ab: bool, text: &[u8; RT_LEN]) {
        for segment in 0..16u16 {
            let idx = usize::from(segment) * 4;
            let chars = [text[idx], text[idx + 1], text[idx + 2], text[idx + 3]];
            decoder.ingest(rt_group(text_ab, segment, &chars));
        }
    }

    fn sample_text() -> [u8; RT_LEN] {
        let mut text = [0u8; RT_LEN];
        for (idx, byte) in text.iter_mut().enumerate() {
            *byte = b'A' + (idx % 26) as u8;
        }
        text
    }

    #[test]
    fn text_published_on_wraparound() {
        let (mut decoder, events) = recording_decoder();
        let text = sample_text();

        send_text(&mut decoder, false, &text);
        assert!(take(&events).is_empty());

        decoder.ingest(rt_group(false, 0, b"ABCD"));
        let expected = String::from_utf8(text.to_vec()).unwrap();
        assert_eq!(take(&events), vec![rt(&expected)]);
        assert_eq!(decoder.radio_text(), expected);

        // Same text again: no repeat.
        send_text(&mut decoder, false, &text);
        decoder.ingest(rt_group(false, 0, b"ABCD"));
        assert!(take(&events).is_empty());
    }

    #[test]
    fn text_toggle_clears_before_writing() {
        let (mut decoder, events) = recording_decoder();

        decoder.ingest(rt_group(false, 0, b"ABCD"));
        decoder.ingest(rt_group(false, 1, b"EFGH"));
        decoder.ingest(rt_group(false, 2, b"IJKL"));
        // Wraps and toggles at once: old text goes out first, then the clear.
        decoder.ingest(rt_group(true, 0, b"WXYZ"));
        assert_eq!(take(&events), vec![rt("ABCDEFGHIJKL")]);

        decoder.ingest(rt_group(true, 1, b"1234"));
        decoder.ingest(rt_group(true, 0, b"WXYZ"));
        assert_eq!(take(&events), vec![rt("WXYZ1234")]);
    }

    #[test]
    fn text_toggle_without_wraparound_drops_old_segments() {
        let (mut decoder, events) = recording_decoder();

        decoder.ingest(rt_group(false, 0, b"ABCD"));
        decoder.ingest(rt_group(false, 1, b"EFGH"));
        decoder.ingest(rt_group(true, 2, b"IJKL"));
        decoder.ingest(rt_group(true, 3, b"MNOP"));
        // Offsets 0 and 4 were cleared, so the buffer renders empty.
        decoder.ingest(rt_group(true, 0, b"QRST"));
        assert!(take(&events).is_empty());

        decoder.ingest(rt_group(true, 1, b"UVWX"));
        decoder.ingest(rt_group(true, 2, b"IJKL"));
        decoder.ingest(rt_group(true, 0, b"QRST"));
        assert_eq!(take(&events), vec![rt("QRSTUVWXIJKLMNOP")]);
    }

    #[test]
    fn text_ends_at_carriage_return() {
        let (mut decoder, events) = recording_decoder();

        decoder.ingest(rt_group(false, 0, b"Hell"));
        decoder.ingest(rt_group(false, 1, b"o\r  "));
        decoder.ingest(rt_group(false, 0, b"Hell"));
        assert_eq!(take(&events), vec![rt("Hello")]);
    }

    #[test]
    fn version_b_text_groups_are_ignored() {
        let (mut decoder, events) = recording_decoder();
        let before = decoder.state.clone();
        decoder.ingest_blocks(PI, 0x2800 | 0x3, 0x4142, 0x4344);
        decoder.ingest_blocks(PI, 0x2800, 0x4142, 0x4344);
        assert!(take(&events).is_empty());
        assert_eq!(decoder.state.rt_bytes, before.rt_bytes);
        assert_eq!(decoder.state.rt_last_index, 0);
    }

    #[test]
    fn clock_time_debounced_per_minute() {
        let (mut decoder, events) = recording_decoder();

        decoder.ingest(ct_group(60_000, 10, 15, 0));
        decoder.ingest(ct_group(60_000, 10, 15, 0));
        let expected = ClockTime {
            hour: 10,
            minute: 15,
            mjd: 60_000,
            utc_offset_half_hours: 0,
        };
        assert_eq!(take(&events), vec![RdsEvent::ClockTime(expected)]);

        decoder.ingest(ct_group(60_000, 10, 16, 0));
        assert_eq!(take(&events).len(), 1);
        assert_eq!(decoder.clock_time().map(|t| t.minute), Some(16));
    }

    #[test]
    fn first_clock_time_at_midnight_is_published() {
        let (mut decoder, events) = recording_decoder();
        decoder.ingest(ct_group(60_000, 0, 0, 0));
        assert_eq!(take(&events).len(), 1);
    }

    #[test]
    fn clock_time_applies_signed_offset() {
        let (mut decoder, events) = recording_decoder();

        // 22:45 UTC, +2h -> 00:45 next day.
        decoder.ingest(ct_group(60_000, 22, 45, 4));
        let expected = ClockTime {
            hour: 0,
            minute: 45,
            mjd: 60_001,
            utc_offset_half_hours: 4,
        };
        assert_eq!(take(&events), vec![RdsEvent::ClockTime(expected)]);

        // 01:10 UTC, -3h30 -> 21:40 previous day.
        decoder.ingest(ct_group(60_000, 1, 10, -7));
        let expected = ClockTime {
            hour: 21,
            minute: 40,
            mjd: 59_999,
            utc_offset_half_hours: -7,
        };
        assert_eq!(take(&events), vec![RdsEvent::ClockTime(expected)]);
    }

    #[test]
    fn clock_time_decodes_high_mjd_bits() {
        let (mut decoder, events) = recording_decoder();
        decoder.ingest(ct_group(0x1_8abc, 16, 0, 0));
        match take(&events).as_slice() {
            [RdsEvent::ClockTime(time)] => {
                assert_eq!(time.mjd, 0x1_8abc);
                assert_eq!(time.hour, 16);
            }
            other => panic!("unexpected events: {:?}", other),
        }
    }

    #[test]
    fn sentinel_resets_and_pushes_placeholders() {
        let (mut decoder, events) = recording_decoder();

        // Fresh decoder: still pushes both placeholders.
        decoder.ingest(RdsGroup::CLEAR);
        assert_eq!(take(&events), vec![ps("        "), rt("")]);

        for _ in 0..2 {
            send_name_cycle(&mut decoder, b"STATION1");
        }
        send_text(&mut decoder, false, &sample_text());
        decoder.ingest(ct_group(60_000, 8, 0, 0));
        assert_eq!(take(&events).len(), 2);

        decoder.ingest_blocks(0, 0x1234, 0x5678, 0x9abc);
        assert_eq!(take(&events), vec![ps("        "), rt("")]);
        assert_eq!(decoder.state, Assembly::new());

        // The same station comes back after retuning and is published again.
        for _ in 0..2 {
            send_name_cycle(&mut decoder, b"STATION1");
        }
        assert_eq!(take(&events), vec![ps("STATION1")]);
    }

    #[test]
    fn reset_emits_nothing() {
        let (mut decoder, events) = recording_decoder();
        for _ in 0..2 {
            send_name_cycle(&mut decoder, b"STATION2");
        }
        take(&events);

        decoder.reset();
        assert!(take(&events).is_empty());
        assert_eq!(decoder.service_name(), "        ");
        assert_eq!(decoder.state.ps_candidate, PS_PLACEHOLDER);
        assert!(decoder.last_header().is_none());
    }

    #[test]
    fn other_group_types_touch_nothing() {
        let (mut decoder, events) = recording_decoder();
        decoder.ingest(ps_group(0, b"AB"));
        decoder.ingest(rt_group(false, 3, b"WXYZ"));

        for code in [0x6Au8, 0x8A, 0xAA, 0xCA, 0xEA, 0x1A, 0x3B, 0x4B, 0xFB] {
            let mut before = decoder.state.clone();
            let number = u16::from(code >> 4) << 12;
            let version = u16::from(code & 0x1) << 11;
            decoder.ingest_blocks(PI, number | version | 0x0010, 0x4142, 0x4142);

            let header = decoder.last_header().unwrap();
            assert_eq!(header.group_type.code(), code);
            before.header = Some(header);
            assert_eq!(decoder.state, before);
        }
        assert!(take(&events).is_empty());
    }

    #[test]
    fn registering_a_callback_replaces_the_previous_one() {
        let first = Arc::new(Mutex::new(0u32));
        let second = Arc::new(Mutex::new(0u32));
        let mut decoder = RdsDecoder::new();

        let counter = first.clone();
        decoder.on_radio_text(move |_| *counter.lock().unwrap() += 1);
        let counter = second.clone();
        decoder.on_radio_text(move |_| *counter.lock().unwrap() += 1);

        decoder.ingest(RdsGroup::CLEAR);
        assert_eq!(*first.lock().unwrap(), 0);
        assert_eq!(*second.lock().unwrap(), 1);
    }

    #[test]
    fn decoder_without_callbacks_still_tracks_state() {
        let mut decoder = RdsDecoder::default();
        for _ in 0..2 {
            send_name_cycle(&mut decoder, b"SILENT  ");
        }
        assert_eq!(decoder.service_name(), "SILENT  ");
        let header = decoder.last_header().unwrap();
        assert_eq!(header.pi, PI);
        assert_eq!(header.group_type, GroupType::BASIC_TUNING_A);
    }
}
