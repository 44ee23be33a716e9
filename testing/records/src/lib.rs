//! Records whose `create` / `create_many` factories and the generic
//! `dynamically::create::<T>` dispatcher are generated by `build.rs`.

include!(concat!(env!("OUT_DIR"), "/dynamically.rs"));


pub mod shapes {
    use ::dynamically::{Error, Value, __private};
    use std::cell::Cell;

    ///
    /// Point
    ///

    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct Point {
        pub x: i32,
        pub y: i32,
    }

    ///
    /// Line
    ///

    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct Line {
        start: Point,
        end: Point,
    }

    impl Line {
        #[must_use]
        pub const fn new(start: Point, end: Point) -> Self {
            Self { start, end }
        }

        #[must_use]
        pub const fn start(&self) -> &Point {
            &self.start
        }

        #[must_use]
        pub const fn end(&self) -> &Point {
            &self.end
        }
    }

    ///
    /// Shape
    ///

    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct Shape {
        pub lines: Box<[Line]>,
    }

    ///
    /// Drawing
    /// Built from its lines; the title is assigned afterwards.
    ///

    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct Drawing {
        lines: Vec<Line>,
        pub title: String,
    }

    impl Drawing {
        #[must_use]
        pub const fn new(lines: Vec<Line>) -> Self {
            Self {
                lines,
                title: String::new(),
            }
        }

        #[must_use]
        pub fn lines(&self) -> &[Line] {
            &self.lines
        }
    }

    ///
    /// Sample
    ///

    #[derive(Clone, Debug, PartialEq)]
    #[cfg_attr(test, derive(serde::Serialize))]
    pub struct Sample {
        pub flag: bool,
        pub count: u64,
        pub ratio: f64,
        pub name: String,
        pub initial: char,
        pub tags: Vec<String>,
        pub weights: Box<[f32]>,
    }

    thread_local! {
        static COUNTED_CALLS: Cell<usize> = const { Cell::new(0) };
    }

    ///
    /// Counted
    /// Ships its own `create`, which counts invocations per thread.
    ///

    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct Counted {
        pub value: i64,
    }

    impl Counted {
        pub fn create(data: &Value) -> Result<Self, Error> {
            COUNTED_CALLS.with(|calls| calls.set(calls.get() + 1));

            let object = __private::object(data)?;

            Ok(Self {
                value: __private::direct(__private::field(object, "value")?, "value")?,
            })
        }

        #[must_use]
        pub fn calls() -> usize {
            COUNTED_CALLS.with(Cell::get)
        }
    }

    ///
    /// Batch
    ///

    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct Batch {
        pub items: Box<[Counted]>,
    }

    ///
    /// Tag
    ///

    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct Tag(pub String);

    impl Tag {
        // not reachable from the crate root, so a companion factory is used
        #[allow(dead_code)]
        fn create(data: &Value) -> Result<Self, Error> {
            Ok(Self(__private::direct(data, "name")?))
        }
    }

    ///
    /// Labelled
    ///

    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct Labelled {
        pub tag: Tag,
        pub cache: Option<u32>,
    }

    ///
    /// Stamp
    /// Read from a bare number of seconds by its own `create`.
    ///

    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct Stamp {
        seconds: u64,
    }

    impl Stamp {
        pub fn create(data: &Value) -> Result<Self, Error> {
            Ok(Self {
                seconds: __private::direct(data, "seconds")?,
            })
        }

        #[must_use]
        pub const fn seconds(&self) -> u64 {
            self.seconds
        }
    }

    ///
    /// Timeline
    ///

    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct Timeline {
        pub stamps: Vec<Stamp>,
    }
}
