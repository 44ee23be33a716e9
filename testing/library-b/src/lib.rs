//! Same names and shapes as `library-a`, but `Point` ships its own factory
//! and `Drawing` holds a growable list.

pub mod library {
    use dynamically::{Error, Value};

    ///
    /// Point
    ///

    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct Point {
        pub x: i32,
        pub y: i32,
    }

    impl Point {
        /// Accepts `{ "x": .., "y": .. }` or the compact `[x, y]`.
        pub fn create(data: &Value) -> Result<Self, Error> {
            if let Some(pair) = data.as_array() {
                let coord = |index: usize, name: &str| -> Result<i32, Error> {
                    let value = pair.get(index).ok_or_else(|| Error::MissingField {
                        field: name.to_string(),
                    })?;
                    dynamically::__private::direct(value, name)
                };

                return Ok(Self {
                    x: coord(0, "x")?,
                    y: coord(1, "y")?,
                });
            }

            let object = dynamically::__private::object(data)?;

            Ok(Self {
                x: dynamically::__private::direct(dynamically::__private::field(object, "x")?, "x")?,
                y: dynamically::__private::direct(dynamically::__private::field(object, "y")?, "y")?,
            })
        }
    }

    ///
    /// Line
    ///

    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct Line {
        pub start: Point,
        pub end: Point,
    }

    ///
    /// Drawing
    ///

    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct Drawing {
        pub lines: Vec<Line>,
    }
}
