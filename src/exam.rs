use std::ops::RangeInclusive;

pub const TOTAL_QUESTIONS: u16 = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Listening,
    Reading,
}

impl Section {
    pub const ALL: [Section; 2] = [Section::Listening, Section::Reading];

    pub fn title(self) -> &'static str {
        match self {
            Section::Listening => "LISTENING COMPREHENSION",
            Section::Reading => "READING COMPREHENSION",
        }
    }

    pub fn bounds(self) -> (u16, u16) {
        match self {
            Section::Listening => (1, 100),
            Section::Reading => (101, 200),
        }
    }

    pub fn questions(self) -> RangeInclusive<u16> {
        let (start, end) = self.bounds();
        start..=end
    }

    pub fn len(self) -> u16 {
        let (start, end) = self.bounds();
        end - start + 1
    }

    pub fn parts(self) -> impl Iterator<Item = &'static Part> {
        PARTS.iter().filter(move |p| p.section == self)
    }
}

/// One of the seven fixed TOEIC parts: a named, contiguous question range.
#[derive(Debug, PartialEq, Eq)]
pub struct Part {
    pub number: u8,
    pub name: &'static str,
    pub section: Section,
    pub start: u16,
    pub end: u16,
}

impl Part {
    pub fn questions(&self) -> RangeInclusive<u16> {
        self.start..=self.end
    }

    pub fn len(&self) -> u16 {
        self.end - self.start + 1
    }

    pub fn contains(&self, question: u16) -> bool {
        (self.start..=self.end).contains(&question)
    }
}

/// The standard TOEIC structure. Partitions [1, 200] exactly: parts 1-4 are
/// listening (1-100), parts 5-7 are reading (101-200).
pub const PARTS: [Part; 7] = [
    Part {
        number: 1,
        name: "Photographs",
        section: Section::Listening,
        start: 1,
        end: 6,
    },
    Part {
        number: 2,
        name: "Question-Response",
        section: Section::Listening,
        start: 7,
        end: 31,
    },
    Part {
        number: 3,
        name: "Conversations",
        section: Section::Listening,
        start: 32,
        end: 70,
    },
    Part {
        number: 4,
        name: "Short Talks",
        section: Section::Listening,
        start: 71,
        end: 100,
    },
    Part {
        number: 5,
        name: "Incomplete Sentences",
        section: Section::Reading,
        start: 101,
        end: 130,
    },
    Part {
        number: 6,
        name: "Text Completion",
        section: Section::Reading,
        start: 131,
        end: 146,
    },
    Part {
        number: 7,
        name: "Reading Comprehension",
        section: Section::Reading,
        start: 147,
        end: 200,
    },
];

pub fn part_for(question: u16) -> Option<&'static Part> {
    PARTS.iter().find(|p| p.contains(question))
}

pub fn section_for(question: u16) -> Option<Section> {
    part_for(question).map(|p| p.section)
}

pub fn is_part_start(question: u16) -> bool {
    PARTS.iter().any(|p| p.start == question)
}
