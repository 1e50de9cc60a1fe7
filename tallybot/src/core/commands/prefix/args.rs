use nom::{
    branch::alt,
    bytes::complete as by,
    character::complete as ch,
    combinator::{all_consuming, iterator, map_opt, opt, ParserIterator},
    error::Error as NomError,
    sequence::{delimited, preceded, terminated},
    Err as NomErr, IResult,
};
use twilight_model::id::{marker::UserMarker, Id};

type ItemError<'m> = NomError<&'m str>;
type ItemFn<'m> = fn(&'m str) -> IResult<&'m str, &'m str, ItemError<'m>>;

/// Whitespace separated arguments; quoted arguments may contain whitespace.
pub struct Args<'m> {
    iter: ParserIterator<&'m str, ItemError<'m>, ItemFn<'m>>,
}

impl<'m> Args<'m> {
    pub fn new(content: &'m str) -> Self {
        Self {
            iter: iterator(content, Self::next_item),
        }
    }

    pub fn rest(self) -> &'m str {
        match self.iter.finish() {
            Ok((rest, _)) => rest,
            Err(err) => {
                error!(?err, "Error while getting rest of args");

                match err {
                    NomErr::Incomplete(_) => "",
                    NomErr::Error(err) | NomErr::Failure(err) => err.input,
                }
            }
        }
    }

    fn next_item(input: &'m str) -> IResult<&'m str, &'m str, ItemError<'m>> {
        let quote_delimited = |start: char, end: char| {
            delimited(
                ch::char(start),
                by::take_till1(move |c| c == end),
                ch::char(end),
            )
        };

        let simple = map_opt(by::take_till(char::is_whitespace), |item: &str| {
            (!item.is_empty()).then_some(item)
        });

        let options = (
            quote_delimited('"', '"'),
            quote_delimited('\'', '\''),
            simple,
        );

        terminated(alt(options), ch::multispace0)(input)
    }
}

impl<'m> Iterator for Args<'m> {
    type Item = &'m str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        (&mut self.iter).next()
    }
}

/// Parses either a user mention like `<@123>` / `<@!123>` or a plain user id.
pub fn parse_user(arg: &str) -> Option<Id<UserMarker>> {
    let mention = delimited(
        by::tag::<_, _, ()>("<@"),
        preceded(opt(ch::char('!')), ch::u64),
        ch::char('>'),
    );

    let (_, id) = all_consuming(alt((mention, ch::u64)))(arg).ok()?;

    Id::new_checked(id)
}
