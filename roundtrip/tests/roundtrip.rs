use rollabi_abi::{Address, Error, Message as _, Selector, I256, U256};
use rollabi_roundtrip::*;

fn word(n: u8) -> [u8; 32] {
    let mut word = [0; 32];
    word[31] = n;
    word
}

fn chapter(title: &str) -> Chapter {
    Chapter {
        title: title.to_string(),
    }
}

fn every_message() -> Vec<Message> {
    vec![
        Message::Notice(Notice {
            text: "low on shelf space".into(),
            level: -3,
        }),
        Message::AddBook(AddBook {
            book: Book {
                chapters: vec![chapter("A"), chapter("B")],
                isbn: vec![0x97, 0x80, 0x13],
                pages: 0x00ff_ffff,
            },
            owner: Address::from_low_u64_be(0xbeef),
        }),
        Message::AddChapter(AddChapter {
            book: chapter("intro"),
        }),
        Message::Transfer(Transfer {
            to: Address::from_low_u64_be(1),
            amount: U256::MAX,
        }),
        Message::Adjust(Adjust {
            delta: I256::from_i128(-1_000_000_000_000_000_000_000),
            flags: vec![true, false, true],
            counts: vec![],
        }),
        Message::Plot(Plot {
            origin: Point { x: 1, y: -2 },
            offsets: vec![i16::MIN, 0, i16::MAX],
            owners: vec![Address::zero(), Address::repeat_byte(0xff)],
        }),
        Message::Count(Count {}),
        Message::Lookup(Lookup {
            titles: vec!["".into(), "Moby Dick".into(), "x".repeat(70)],
        }),
        Message::H(H {
            id: vec![0, 7, 255],
        }),
    ]
}

#[test]
fn every_message_round_trips() {
    for message in every_message() {
        let payload = message.encode().unwrap();
        assert_eq!(payload[..4], message.selector().0);
        assert_eq!((payload.len() - 4) % 32, 0);
        assert_eq!(Message::decode(&payload).unwrap(), message, "{}", message.name());
    }
}

#[test]
fn typed_decode_matches_enum_decode() {
    let transfer = Transfer {
        to: Address::from_low_u64_be(7),
        amount: U256::from(1000u64),
    };
    let payload = transfer.encode().unwrap();
    assert_eq!(Transfer::decode(&payload).unwrap(), transfer);
    assert_eq!(
        AddChapter::decode(&payload),
        Err(Error::SelectorMismatch {
            expected: AddChapter::SELECTOR,
            found: Transfer::SELECTOR,
        })
    );
}

#[test]
fn selectors_come_from_signatures() {
    assert_eq!(Transfer::SIGNATURE, "transfer(address,uint256)");
    assert_eq!(Transfer::SELECTOR, Selector([0xa9, 0x05, 0x9c, 0xbb]));
    assert_eq!(AddBook::SIGNATURE, "AddBook(((string)[],bytes,uint24),address)");
    assert_eq!(Adjust::SIGNATURE, "Adjust(int256,bool[],uint64[])");
    assert_eq!(Count::SIGNATURE, "Count()");
    assert_eq!(Plot::SIGNATURE, "Plot((int16,int16),int16[],address[])");
    assert_eq!(H::SIGNATURE, "H(uint8[])");
    let registry = registry().unwrap();
    for message in every_message() {
        let spec = registry.get(&message.selector()).unwrap();
        assert_eq!(spec.name(), message.name());
        assert_eq!(message.selector(), Selector::from_signature(spec.signature()));
    }
}

#[test]
fn add_chapter_wire_format() {
    let payload = AddChapter {
        book: chapter("intro"),
    }
    .encode()
    .unwrap();

    let mut expected = Selector::from_signature("AddChapter((string))").0.to_vec();
    expected.extend(word(0x20)); // offset of the tuple
    expected.extend(word(0x20)); // offset of the title inside the tuple
    expected.extend(word(5));
    let mut title = b"intro".to_vec();
    title.resize(32, 0);
    expected.extend(title);
    assert_eq!(payload, expected);
}

#[test]
fn narrow_integer_arrays_are_arrays_not_bytes() {
    let payload = H { id: vec![1, 2, 3] }.encode().unwrap();
    let mut expected = Selector::from_signature("H(uint8[])").0.to_vec();
    expected.extend(word(0x20));
    expected.extend(word(3));
    expected.extend(word(1));
    expected.extend(word(2));
    expected.extend(word(3));
    assert_eq!(payload, expected);
}

#[test]
fn static_structs_are_encoded_in_place() {
    let payload = Plot {
        origin: Point { x: 1, y: -2 },
        offsets: vec![],
        owners: vec![],
    }
    .encode()
    .unwrap();

    let mut minus_two = [0xff; 32];
    minus_two[31] = 0xfe;
    let mut expected = Plot::SELECTOR.0.to_vec();
    expected.extend(word(1));
    expected.extend(minus_two);
    expected.extend(word(0x80)); // offsets follow the four head words
    expected.extend(word(0xa0));
    expected.extend(word(0));
    expected.extend(word(0));
    assert_eq!(payload, expected);
    assert_eq!(Point::abi_type().to_string(), "(int16,int16)");
}

#[test]
fn nested_tuple_arrays_round_trip() {
    let book = Book {
        chapters: vec![chapter("A"), chapter("B")],
        isbn: vec![],
        pages: 2,
    };
    let message = AddBook {
        book: book.clone(),
        owner: Address::zero(),
    };
    let decoded = AddBook::decode(&message.encode().unwrap()).unwrap();
    assert_eq!(decoded.book, book);
    assert_eq!(decoded.book.chapters[1].title, "B");
    assert_eq!(Book::abi_type().to_string(), "((string)[],bytes,uint24)");
}

#[test]
fn narrow_integers_are_range_checked() {
    let message = AddBook {
        book: Book {
            chapters: vec![],
            isbn: vec![],
            pages: 1 << 24,
        },
        owner: Address::zero(),
    };
    assert!(matches!(message.encode(), Err(Error::OutOfRange { .. })));
}

#[test]
fn abi_json_describes_every_message() {
    let abi: serde_json::Value = serde_json::from_str(ABI_JSON).unwrap();
    let names: Vec<_> = abi
        .as_array()
        .unwrap()
        .iter()
        .map(|function| function["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        [
            "Notice",
            "AddBook",
            "AddChapter",
            "transfer",
            "Adjust",
            "Plot",
            "Count",
            "Lookup",
            "H"
        ]
    );
    let chapters = &abi[1]["inputs"][0]["components"][0];
    assert_eq!(chapters["type"], "tuple[]");
    assert_eq!(chapters["internalType"], "struct Chapter[]");
    assert_eq!(chapters["components"][0]["name"], "title");
}

#[derive(Default)]
struct Library {
    chapters: Vec<String>,
    received: U256,
    adjustments: usize,
    owners: usize,
    inspections: Vec<usize>,
}

impl AdvanceHandler for Library {
    type Error = Error;

    fn add_book(&mut self, message: AddBook) -> Result<(), Error> {
        self.chapters
            .extend(message.book.chapters.into_iter().map(|c| c.title));
        Ok(())
    }

    fn add_chapter(&mut self, message: AddChapter) -> Result<(), Error> {
        self.chapters.push(message.book.title);
        Ok(())
    }

    fn transfer(&mut self, message: Transfer) -> Result<(), Error> {
        self.received = self.received + message.amount;
        Ok(())
    }

    fn adjust(&mut self, _message: Adjust) -> Result<(), Error> {
        self.adjustments += 1;
        Ok(())
    }

    fn plot(&mut self, message: Plot) -> Result<(), Error> {
        self.owners += message.owners.len();
        Ok(())
    }
}

impl InspectHandler for Library {
    type Error = Error;

    fn count(&mut self, _message: Count) -> Result<(), Error> {
        self.inspections.push(self.chapters.len());
        Ok(())
    }

    fn lookup(&mut self, message: Lookup) -> Result<(), Error> {
        self.inspections.push(message.titles.len());
        Ok(())
    }

    fn h(&mut self, message: H) -> Result<(), Error> {
        self.inspections.push(message.id.len());
        Ok(())
    }
}

#[test]
fn dispatches_to_handlers() {
    let mut library = Library::default();
    for message in every_message() {
        let payload = message.encode().unwrap();
        match message {
            Message::Count(_) | Message::Lookup(_) | Message::H(_) => {
                dispatch_inspect(&mut library, &payload).unwrap()
            }
            Message::Notice(_) => {}
            _ => dispatch_advance(&mut library, &payload).unwrap(),
        }
    }
    assert_eq!(library.chapters, ["A", "B", "intro"]);
    assert_eq!(library.received, U256::MAX);
    assert_eq!(library.adjustments, 1);
    assert_eq!(library.owners, 2);
    assert_eq!(library.inspections, [3, 3, 3]);
}

#[test]
fn dispatch_rejects_other_categories() {
    let mut library = Library::default();
    let count = Count {}.encode().unwrap();
    assert_eq!(
        dispatch_advance(&mut library, &count),
        Err(Error::UnsupportedMessage {
            category: "advance",
            selector: Count::SELECTOR,
        })
    );

    let notice = Notice {
        text: "hi".into(),
        level: 0,
    }
    .encode()
    .unwrap();
    assert!(matches!(
        dispatch_inspect(&mut library, &notice),
        Err(Error::UnsupportedMessage {
            category: "inspect",
            ..
        })
    ));
}

#[test]
fn malformed_payloads_are_errors() {
    let mut library = Library::default();
    assert!(matches!(
        Message::decode(&[0xa9, 0x05, 0x9c]),
        Err(Error::MalformedPayload(_))
    ));
    assert!(matches!(
        dispatch_advance(&mut library, &[0xa9]),
        Err(Error::MalformedPayload(_))
    ));

    let mut payload = Transfer {
        to: Address::zero(),
        amount: U256::one(),
    }
    .encode()
    .unwrap();
    payload.push(0);
    assert!(matches!(
        Message::decode(&payload),
        Err(Error::MalformedPayload(_))
    ));
    assert!(matches!(
        Transfer::decode(&Transfer::SELECTOR.0),
        Err(Error::MalformedPayload(_))
    ));

    let mut count = Count {}.encode().unwrap();
    assert_eq!(count, Count::SELECTOR.0);
    count.extend(word(0));
    assert!(matches!(
        Count::decode(&count),
        Err(Error::MalformedPayload(_))
    ));

    assert_eq!(
        Message::decode(&[0xde, 0xad, 0xbe, 0xef]),
        Err(Error::SelectorNotFound(Selector([0xde, 0xad, 0xbe, 0xef])))
    );
}

#[test]
fn registry_unpacks_by_selector() {
    let registry = registry().unwrap();
    assert_eq!(registry.len(), 9);
    let payload = AddChapter {
        book: chapter("intro"),
    }
    .encode()
    .unwrap();
    let (spec, values) = registry.unpack(&payload).unwrap();
    assert_eq!(spec.name(), "AddChapter");
    assert_eq!(
        AddChapter::from_values(values).unwrap(),
        AddChapter {
            book: chapter("intro")
        }
    );
    assert_eq!(
        registry.by_name("transfer").map(|spec| spec.selector()),
        Some(Transfer::SELECTOR)
    );
}
